#![no_std]

extern crate alloc;

pub mod network;
pub mod platform;
pub mod publisher;
pub mod secrets;
pub mod sensors;
