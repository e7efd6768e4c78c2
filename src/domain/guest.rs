use super::{guest_email::GuestEmail, Error};

/// One row of the guest information report, trimmed.
///
/// The email has only passed the row filter (it contains an `@`); it has not
/// been validated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuestRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl GuestRecord {
    pub fn new(
        first_name: impl AsRef<str>,
        last_name: impl AsRef<str>,
        email: impl AsRef<str>,
    ) -> Self {
        Self {
            first_name: first_name.as_ref().trim().to_owned(),
            last_name: last_name.as_ref().trim().to_owned(),
            email: email.as_ref().trim().to_owned(),
        }
    }
}

/// A guest ready to be enrolled in the newsletter.
#[derive(Clone, Debug)]
pub struct NewSubscriber {
    pub email: GuestEmail,
    pub first_name: String,
    pub last_name: String,
}

impl TryFrom<GuestRecord> for NewSubscriber {
    type Error = Error;

    fn try_from(value: GuestRecord) -> Result<Self, Self::Error> {
        Ok(NewSubscriber {
            email: GuestEmail::parse(value.email)?,
            first_name: value.first_name,
            last_name: value.last_name,
        })
    }
}
