//! Identifiers handed out while a scene is assembled.
//! `NodeID` is a pre-order position inside one scene (index 0 = nil, root = 1).
//! `DataSetKey` is a stable hash of a ShareDataSet name; references carry the key, never the data.

use std::fmt;

use thiserror::Error;

pub const fn string_to_u64(s: &str) -> u64 {
    let mut hash: u64 = 0xA0761D6478BD642F;
    let bytes = s.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(0xE7037ED1A0B428DB);
        hash = mix64(hash);
        i += 1;
    }

    mix64(hash ^ (bytes.len() as u64))
}

pub const fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^= x >> 31;
    x
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    #[error("empty {0} string")]
    Empty(&'static str),
    #[error("invalid {kind} string `{input}`: {reason}")]
    Invalid {
        kind: &'static str,
        input: String,
        reason: std::num::ParseIntError,
    },
}

fn parse_hex(kind: &'static str, s: &str) -> Result<u64, IdParseError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.is_empty() {
        return Err(IdParseError::Empty(kind));
    }
    u64::from_str_radix(digits, 16).map_err(|reason| IdParseError::Invalid {
        kind,
        input: s.to_string(),
        reason,
    })
}

/// Defines a dense index ID. Index 0 is reserved as nil.
macro_rules! define_index_id {
    ($type_name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $type_name(pub u32);

        impl $type_name {
            #[inline]
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            #[inline]
            pub const fn nil() -> Self {
                Self(0)
            }

            #[inline]
            pub const fn index(self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn is_nil(self) -> bool {
                self.0 == 0
            }

            /// Position in a zero-based table, `None` for nil.
            #[inline]
            pub const fn slot(self) -> Option<usize> {
                if self.0 == 0 {
                    None
                } else {
                    Some((self.0 - 1) as usize)
                }
            }

            #[inline]
            pub const fn from_slot(slot: usize) -> Self {
                Self(slot as u32 + 1)
            }
        }

        impl Default for $type_name {
            fn default() -> Self {
                Self::nil()
            }
        }

        impl fmt::Debug for $type_name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($type_name), "({})"), self.0)
            }
        }

        impl fmt::Display for $type_name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "#{}", self.0)
            }
        }
    };
}

/// Defines an ID derived from a name hash.
macro_rules! define_hashed_id {
    ($type_name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $type_name(pub u64);

        impl $type_name {
            #[inline]
            pub const fn from_name(name: &str) -> Self {
                Self(string_to_u64(name))
            }

            #[inline]
            pub const fn as_u64(self) -> u64 {
                self.0
            }

            /// Fixed-width hex; JSON numbers cannot carry all 64 bits.
            pub fn to_hex(self) -> String {
                format!("{:016x}", self.0)
            }

            pub fn parse_str(s: &str) -> Result<Self, IdParseError> {
                parse_hex(stringify!($type_name), s).map(Self)
            }
        }

        impl fmt::Debug for $type_name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($type_name), "({:016x})"), self.0)
            }
        }

        impl fmt::Display for $type_name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:016x}", self.0)
            }
        }
    };
}

define_index_id!(
    NodeID,
    "Node ID: pre-order position assigned when a scene is indexed."
);

define_hashed_id!(
    DataSetKey,
    "Shared dataset key: hash of the ShareDataSet name."
);

impl NodeID {
    /// Parse a decimal index, with or without the `#` display prefix.
    pub fn parse_str(s: &str) -> Result<Self, IdParseError> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.is_empty() {
            return Err(IdParseError::Empty("NodeID"));
        }
        digits
            .parse::<u32>()
            .map(Self)
            .map_err(|reason| IdParseError::Invalid {
                kind: "NodeID",
                input: s.to_string(),
                reason,
            })
    }
}
