use itertools::Itertools;

use crate::core::{location::Location, merge::MergedEntry};

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Render the entries as a JSON array, one entry per line.
#[must_use]
pub fn json(entries: &[MergedEntry]) -> String {
    let lines = entries
        .iter()
        .map(|entry| {
            format!(
                r#"{{"hour": {}, "speed": {:.2}, "gust": {:.2}, "price": {:.2}}}"#,
                js_string(&entry.hour),
                entry.wind_speed,
                entry.wind_gust,
                entry.price,
            )
        })
        .join(",\n");
    format!("[\n{lines}\n]\n")
}

/// Render the page with the wind and price chart.
#[must_use]
pub fn html(entries: &[MergedEntry], location: &Location) -> String {
    let times = entries.iter().map(|entry| js_string(&entry.hour)).join(", ");
    let speeds = entries.iter().map(|entry| format!("{:.2}", entry.wind_speed)).join(", ");
    let gusts = entries.iter().map(|entry| format!("{:.2}", entry.wind_gust)).join(", ");
    let prices = entries.iter().map(|entry| format!("{:.2}", entry.price)).join(", ");
    let title = escape_html(&format!("Winds at {location}"));
    let chart_title = js_string(&format!("Wind speeds and prices for {location}"));
    format!(
        r#"<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="https://cdnjs.cloudflare.com/ajax/libs/Chart.js/2.9.4/Chart.js"></script>
</head>
<body>
<h1>{title}</h1>
<canvas id="myChart" style="width:90%;max-width:1024px;margin:1em"></canvas>
<script>
var times = [ {times} ];
var speeds = [ {speeds} ];
var gusts = [ {gusts} ];
var prices = [ {prices} ];
new Chart("myChart", {{
  type: "line",
  data: {{
    labels: times,
    datasets: [{{
      label: "Average",
      data: speeds,
      borderColor: "green",
      fill: false
    }},
    {{
      label: "Gust",
      data: gusts,
      borderColor: "red",
      fill: false
    }},
    {{
      label: "Price",
      data: prices,
      borderColor: "blue",
      fill: false
    }}]
  }},
  options: {{
    title: {{
      display: true,
      text: {chart_title}
    }}
  }}
}});
</script>
</body>
</html>
"#
    )
}

/// Render the navigation page.
#[must_use]
pub fn root(location: &Location) -> String {
    let title = escape_html(&format!("Winds at {location}"));
    format!(
        r#"<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<h1>{title}</h1>
<ul>
<li><a href="/wind.html">Winds HTML</a></li>
<li><a href="/wind.json">Winds JSON</a></li>
</ul>
</body>
</html>
"#
    )
}

/// Quote the string as a JSON string literal, which is also a valid JavaScript one.
fn js_string(value: &str) -> String {
    // Serializing a `str` cannot fail.
    serde_json::to_string(value).unwrap_or_default().replace("</", "<\\/")
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for character in value.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(character),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::{core::location::Coordinates, prelude::*};

    fn entries() -> Vec<MergedEntry> {
        vec![
            MergedEntry {
                hour: "2023-02-15T14:00".to_owned(),
                wind_speed: 3.2,
                wind_gust: 5.1,
                price: 0.45,
            },
            MergedEntry {
                hour: "2023-02-15T15:00".to_owned(),
                wind_speed: 3.456,
                wind_gust: 6.0,
                price: 0.0,
            },
        ]
    }

    #[test]
    fn json_ok() {
        assert_eq!(
            json(&entries()),
            concat!(
                "[\n",
                r#"{"hour": "2023-02-15T14:00", "speed": 3.20, "gust": 5.10, "price": 0.45},"#,
                "\n",
                r#"{"hour": "2023-02-15T15:00", "speed": 3.46, "gust": 6.00, "price": 0.00}"#,
                "\n]\n",
            ),
        );
    }

    #[test]
    fn json_parses_back() -> Result {
        let values: Vec<serde_json::Value> = serde_json::from_str(&json(&entries()))?;
        assert_eq!(values.len(), 2);
        assert_eq!(values[0]["hour"], "2023-02-15T14:00");
        assert_abs_diff_eq!(values[0]["speed"].as_f64().context("speed")?, 3.2);
        assert_abs_diff_eq!(values[0]["gust"].as_f64().context("gust")?, 5.1);
        assert_abs_diff_eq!(values[0]["price"].as_f64().context("price")?, 0.45);
        assert_abs_diff_eq!(values[1]["speed"].as_f64().context("speed")?, 3.46);
        Ok(())
    }

    #[test]
    fn json_empty_is_valid() -> Result {
        let values: Vec<serde_json::Value> = serde_json::from_str(&json(&[]))?;
        assert!(values.is_empty());
        Ok(())
    }

    #[test]
    fn html_embeds_arrays() {
        let location = Location::browser(Coordinates::new(55.6049, 13.0038));
        let page = html(&entries(), &location);
        assert!(page.contains(r#"var times = [ "2023-02-15T14:00", "2023-02-15T15:00" ];"#));
        assert!(page.contains("var speeds = [ 3.20, 3.46 ];"));
        assert!(page.contains("var gusts = [ 5.10, 6.00 ];"));
        assert!(page.contains("var prices = [ 0.45, 0.00 ];"));
        assert!(page.contains("<title>Winds at browser location (55.60, 13.00)</title>"));
    }

    #[test]
    fn html_escapes_location() {
        let location = Location::geolocated(
            Coordinates::new(59.33, 18.07),
            "<script>".to_owned(),
            "Sweden".to_owned(),
        );
        let page = html(&[], &location);
        assert!(page.contains("<h1>Winds at &lt;script&gt;, Sweden (59.33, 18.07)</h1>"));
        assert!(page.contains(r#"text: "Wind speeds and prices for <script>, Sweden (59.33, 18.07)""#));
        assert!(page.contains("var times = [  ];"));
    }

    #[test]
    fn root_links() {
        let location = Location::geolocated(
            Coordinates::new(59.33, 18.07),
            "Stockholm".to_owned(),
            "Sweden".to_owned(),
        );
        let page = root(&location);
        assert!(page.contains("<h1>Winds at Stockholm, Sweden (59.33, 18.07)</h1>"));
        assert!(page.contains(r#"<a href="/wind.html">"#));
        assert!(page.contains(r#"<a href="/wind.json">"#));
    }
}
