pub mod controller;
pub mod dto;

#[cfg(test)]
mod controller_test;
