use crate::DomainError;
use std::fmt;
use std::str::FromStr;

pub const MAX_LABEL_LEN: usize = 63;
/// Encoded length limit: labels, their length octets and the root terminator.
pub const MAX_NAME_LEN: usize = 255;

/// A domain name as an ordered list of labels, root label implied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainName {
    labels: Vec<Box<[u8]>>,
    wire_len: usize,
}

impl DomainName {
    pub fn root() -> Self {
        Self {
            labels: Vec::new(),
            wire_len: 1,
        }
    }

    pub fn from_labels<I, L>(labels: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let mut name = Self::root();
        for label in labels {
            name.push_label(label.as_ref())
                .map_err(DomainError::InvalidDomainName)?;
        }
        Ok(name)
    }

    /// Appends a label, enforcing the 63-byte label and 255-byte name limits.
    pub(crate) fn push_label(&mut self, label: &[u8]) -> Result<(), String> {
        if label.is_empty() {
            return Err("empty label".to_string());
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(format!(
                "label of {} bytes exceeds {} bytes",
                label.len(),
                MAX_LABEL_LEN
            ));
        }
        let wire_len = self.wire_len + 1 + label.len();
        if wire_len > MAX_NAME_LEN {
            return Err(format!(
                "name of {} bytes exceeds {} bytes",
                wire_len, MAX_NAME_LEN
            ));
        }
        self.labels.push(label.into());
        self.wire_len = wire_len;
        Ok(())
    }

    pub fn labels(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        self.labels.iter().map(|label| &**label)
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    /// Length of the uncompressed encoding.
    pub fn wire_len(&self) -> usize {
        self.wire_len
    }

    /// Uncompressed encoding: length-prefixed labels and a zero terminator.
    pub fn to_wire(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.wire_len);
        for label in &self.labels {
            out.push(label.len() as u8);
            out.extend_from_slice(label);
        }
        out.push(0);
        out
    }
}

impl Default for DomainName {
    fn default() -> Self {
        Self::root()
    }
}

impl FromStr for DomainName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.strip_suffix('.').unwrap_or(s);
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        let mut name = Self::root();
        for label in trimmed.split('.') {
            if !label.is_ascii() {
                return Err(DomainError::InvalidDomainName(format!(
                    "'{}' contains non-ASCII characters",
                    s
                )));
            }
            name.push_label(label.as_bytes())
                .map_err(|reason| DomainError::InvalidDomainName(format!("'{}': {}", s, reason)))?;
        }
        Ok(name)
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.labels.is_empty() {
            return f.write_str(".");
        }
        for (i, label) in self.labels.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            for &byte in label.iter() {
                if byte.is_ascii_graphic() && byte != b'.' && byte != b'\\' {
                    write!(f, "{}", byte as char)?;
                } else {
                    write!(f, "\\{:03}", byte)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let name: DomainName = "www.example.com".parse().unwrap();
        assert_eq!(name.label_count(), 3);
        assert_eq!(name.to_string(), "www.example.com");
        assert_eq!(name.wire_len(), 17);
    }

    #[test]
    fn test_trailing_dot_is_ignored() {
        let a: DomainName = "example.com.".parse().unwrap();
        let b: DomainName = "example.com".parse().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_root_forms() {
        assert!("".parse::<DomainName>().unwrap().is_root());
        assert!(".".parse::<DomainName>().unwrap().is_root());
        assert_eq!(DomainName::root().to_string(), ".");
        assert_eq!(DomainName::root().to_wire(), vec![0]);
    }

    #[test]
    fn test_empty_label_rejected() {
        assert!("www..example.com".parse::<DomainName>().is_err());
    }

    #[test]
    fn test_label_length_limit() {
        let ok = "a".repeat(63);
        assert!(ok.parse::<DomainName>().is_ok());

        let too_long = "a".repeat(64);
        let err = too_long.parse::<DomainName>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidDomainName(_)));
    }

    #[test]
    fn test_name_length_limit() {
        // 4 labels of 63 bytes: 4 * 64 + 1 = 257 bytes encoded
        let label = "a".repeat(63);
        let name = vec![label.as_str(); 4].join(".");
        assert!(name.parse::<DomainName>().is_err());

        // 3 * 64 + 62 + 1 = 255 bytes encoded
        let fits = format!("{}.{}", vec![label.as_str(); 3].join("."), "b".repeat(61));
        let parsed = fits.parse::<DomainName>().unwrap();
        assert_eq!(parsed.wire_len(), 255);
    }

    #[test]
    fn test_to_wire() {
        let name: DomainName = "codecrafters.io".parse().unwrap();
        let mut expected = vec![12];
        expected.extend_from_slice(b"codecrafters");
        expected.push(2);
        expected.extend_from_slice(b"io");
        expected.push(0);
        assert_eq!(name.to_wire(), expected);
    }

    #[test]
    fn test_display_escapes_non_printable_bytes() {
        let name = DomainName::from_labels([&b"a.b"[..], &b"\x00x"[..]]).unwrap();
        assert_eq!(name.to_string(), "a\\046b.\\000x");
    }
}
