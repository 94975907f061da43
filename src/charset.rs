//! Charset resolution for request and response bodies
//!
//! Names are matched case-insensitively. The IANA names that the WHATWG label
//! table folds into other encodings (`ISO-8859-1`, `US-ASCII`, `UTF-16`) or
//! leaves out (the `UTF-32` family) are resolved from a local table first, so
//! the store reports the charset that was asked for. Everything else goes
//! through `encoding_rs`; labels that only map to the replacement decoder are
//! rejected like unknown names.

use encoding_rs::Encoding;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::error::{Error, Result};

/// An IANA charset resolved outside the WHATWG label table
struct Registered {
    name: &'static str,
    aliases: &'static [&'static str],
    /// `encoding_rs` label of the closest codec, if there is one
    codec: Option<&'static str>,
}

const REGISTERED: &[Registered] = &[
    Registered {
        name: "US-ASCII",
        aliases: &[
            "us-ascii",
            "ascii",
            "iso646-us",
            "iso_646.irv:1991",
            "ansi_x3.4-1968",
            "ansi_x3.4-1986",
            "iso-ir-6",
            "cp367",
            "ibm367",
            "csascii",
            "646",
            "us",
            "default",
        ],
        codec: Some("windows-1252"),
    },
    Registered {
        name: "ISO-8859-1",
        aliases: &[
            "iso-8859-1",
            "iso8859-1",
            "iso8859_1",
            "iso_8859_1",
            "iso_8859-1",
            "iso_8859-1:1987",
            "iso-ir-100",
            "8859_1",
            "latin1",
            "l1",
            "cp819",
            "ibm819",
            "ibm-819",
            "819",
            "csisolatin1",
        ],
        codec: Some("windows-1252"),
    },
    Registered {
        name: "UTF-16",
        aliases: &["utf-16", "utf16", "utf_16", "unicode", "unicodebig"],
        codec: Some("utf-16be"),
    },
    Registered {
        name: "UTF-32",
        aliases: &["utf-32", "utf32", "utf_32"],
        codec: None,
    },
    Registered {
        name: "UTF-32BE",
        aliases: &["utf-32be", "utf_32be", "x-utf-32be"],
        codec: None,
    },
    Registered {
        name: "UTF-32LE",
        aliases: &["utf-32le", "utf_32le", "x-utf-32le"],
        codec: None,
    },
];

/// A resolved text encoding
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Charset {
    name: &'static str,
    encoding: Option<&'static Encoding>,
}

impl Charset {
    pub const UTF_8: Charset = Charset {
        name: "UTF-8",
        encoding: Some(encoding_rs::UTF_8),
    };

    /// Resolve a charset by name or alias
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidCharset` if the name is not a known charset.
    pub fn for_name(name: &str) -> Result<Self> {
        let label = name.trim();
        if let Some(registered) = REGISTERED
            .iter()
            .find(|r| r.aliases.iter().any(|a| a.eq_ignore_ascii_case(label)))
        {
            return Ok(Charset {
                name: registered.name,
                encoding: registered
                    .codec
                    .and_then(|codec| Encoding::for_label(codec.as_bytes())),
            });
        }

        Encoding::for_label_no_replacement(label.as_bytes())
            .map(|encoding| Charset {
                name: encoding.name(),
                encoding: Some(encoding),
            })
            .ok_or_else(|| {
                log::warn!("Rejected unknown charset '{name}'");
                Error::InvalidCharset(name.to_string())
            })
    }

    /// Canonical name of the charset
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The codec for collaborators that encode or decode bodies
    ///
    /// `None` for the `UTF-32` family, which `encoding_rs` does not implement.
    /// `US-ASCII` and `ISO-8859-1` decode through `windows-1252`.
    #[must_use]
    pub fn encoding(&self) -> Option<&'static Encoding> {
        self.encoding
    }
}

impl Default for Charset {
    fn default() -> Self {
        Charset::UTF_8
    }
}

impl fmt::Debug for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Charset({})", self.name())
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Charset {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
