mod controllers;
mod middlewares;

pub use helper::*;
