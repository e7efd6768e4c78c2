mod guest;
mod guest_email;

use std::fmt;

pub use self::{
    guest::{GuestRecord, NewSubscriber},
    guest_email::GuestEmail,
};

#[derive(Debug)]
pub struct Error(String);

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for Error {}
