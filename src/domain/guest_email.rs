use std::borrow::Cow;

use super::Error;

/// Characters that disqualify an address outright.
///
/// This is a coarse filter for the junk that turns up in point-of-sale
/// exports, not an RFC 5322 check.
const FORBIDDEN_CHARS: [char; 10] = [',', ' ', '!', '#', '$', '%', '&', '*', '(', ')'];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuestEmail(String);

impl GuestEmail {
    pub fn parse<'s, S>(s: S) -> Result<Self, Error>
    where
        S: Into<Cow<'s, str>>,
    {
        let s = s.into();
        if s.contains(&FORBIDDEN_CHARS[..]) {
            Err(Error(format!("{} is invalid", s)))
        } else {
            Ok(Self(s.into_owned()))
        }
    }
}

impl AsRef<str> for GuestEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GuestEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for GuestEmail {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).map_err(|error| error.to_string())
    }
}
