//! Weather line appended to every summary

pub mod client;

pub use client::{
    AmapWeatherClient, LiveWeather, WEATHER_NOT_CONFIGURED, WEATHER_REQUEST_FAILED,
    WEATHER_UNAVAILABLE, WeatherLookup, parse_weather_body,
};
