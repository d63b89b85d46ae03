mod common;

mod estimation;
mod service;
