use anyhow::{Result, anyhow};
use std::str::FromStr;

/// Speed profiles (km/h) swept by `ALL`, in request order.
pub const STANDARD_PROFILES: [u32; 5] = [40, 60, 80, 100, 120];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSelection {
    Single(u32),
    All,
}

impl ProfileSelection {
    pub fn profiles(&self) -> Vec<u32> {
        match self {
            ProfileSelection::Single(p) => vec![*p],
            ProfileSelection::All => STANDARD_PROFILES.to_vec(),
        }
    }

    /// Profiles the server does not list as allowed.
    pub fn nonstandard(&self) -> Option<u32> {
        match self {
            ProfileSelection::Single(p) if !STANDARD_PROFILES.contains(p) => Some(*p),
            _ => None,
        }
    }
}

impl FromStr for ProfileSelection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(ProfileSelection::All);
        }
        let kmh: u32 = s
            .trim()
            .parse()
            .map_err(|_| anyhow!("profile must be a km/h integer or ALL, got '{s}'"))?;
        Ok(ProfileSelection::Single(kmh))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_and_integers() {
        assert_eq!("ALL".parse::<ProfileSelection>().unwrap(), ProfileSelection::All);
        assert_eq!("all".parse::<ProfileSelection>().unwrap(), ProfileSelection::All);
        assert_eq!(
            "80".parse::<ProfileSelection>().unwrap(),
            ProfileSelection::Single(80)
        );
        assert!("fast".parse::<ProfileSelection>().is_err());
    }

    #[test]
    fn flags_nonstandard_speeds() {
        assert_eq!(ProfileSelection::Single(70).nonstandard(), Some(70));
        assert_eq!(ProfileSelection::Single(60).nonstandard(), None);
        assert_eq!(ProfileSelection::All.nonstandard(), None);
    }
}
