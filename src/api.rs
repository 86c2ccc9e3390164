pub mod client;
pub mod elpris;
pub mod geolocation;
pub mod open_meteo;
