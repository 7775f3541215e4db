//! The serialization formats understood by the [`Store`](crate::store::Store).

use std::fmt;
use std::str::FromStr;

/// A supported RDF serialization format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum RdfFormat {
    /// [Turtle](https://www.w3.org/TR/turtle/)
    Turtle,
    /// [N-Triples](https://www.w3.org/TR/n-triples/)
    NTriples,
}

impl RdfFormat {
    /// The format canonical file extension.
    #[inline]
    pub const fn file_extension(self) -> &'static str {
        match self {
            Self::Turtle => "ttl",
            Self::NTriples => "nt",
        }
    }

    /// The format canonical media type.
    #[inline]
    pub const fn media_type(self) -> &'static str {
        match self {
            Self::Turtle => "text/turtle",
            Self::NTriples => "application/n-triples",
        }
    }

    /// Looks for a known format from an extension.
    ///
    /// ```
    /// use triplestream::io::RdfFormat;
    ///
    /// assert_eq!(RdfFormat::from_extension("nt"), Some(RdfFormat::NTriples));
    /// ```
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "ttl" | "turtle" => Some(Self::Turtle),
            "nt" | "ntriples" | "n-triples" => Some(Self::NTriples),
            _ => None,
        }
    }

    /// Looks for a known format from a media type. Parameters such as `; charset=utf-8` are
    /// ignored.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let essence = media_type.split(';').next().unwrap_or_default().trim();
        [Self::Turtle, Self::NTriples]
            .into_iter()
            .find(|format| format.media_type().eq_ignore_ascii_case(essence))
    }
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Turtle => "Turtle",
            Self::NTriples => "N-Triples",
        })
    }
}

/// The error returned by [`RdfFormat::from_str`] for unknown formats.
#[derive(Debug, Clone, thiserror::Error)]
#[error("The file format '{0}' is unknown")]
pub struct UnknownFormatError(String);

impl FromStr for RdfFormat {
    type Err = UnknownFormatError;

    /// Accepts extensions as well as media types.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::from_extension(name)
            .or_else(|| Self::from_media_type(name))
            .ok_or_else(|| UnknownFormatError(name.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_media_types() {
        assert_eq!("ttl".parse::<RdfFormat>().unwrap(), RdfFormat::Turtle);
        assert_eq!(
            "application/n-triples; charset=utf-8".parse::<RdfFormat>().unwrap(),
            RdfFormat::NTriples
        );
        insta::assert_snapshot!(
            "xml".parse::<RdfFormat>().unwrap_err(),
            @"The file format 'xml' is unknown"
        );
    }
}
