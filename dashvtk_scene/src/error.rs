use std::fmt;

use dashvtk_ids::NodeID;
use dashvtk_nodes::{NodeType, PropertyIssue};
use thiserror::Error;

use crate::fields::SCALARS_REGISTRATION;

/// Coarse classification of a construction failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownType,
    InvalidProperty,
    InvalidParentChild,
    DuplicateScalarRegistration,
    /// Any other `set*` role held by two arrays of one container.
    DuplicateRegistration,
    LengthMismatch,
    UnresolvedReference,
    MutuallyExclusive,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::UnknownType => "unknown-type",
            ErrorKind::InvalidProperty => "invalid-property",
            ErrorKind::InvalidParentChild => "invalid-parent-child",
            ErrorKind::DuplicateScalarRegistration => "duplicate-scalar-registration",
            ErrorKind::DuplicateRegistration => "duplicate-registration",
            ErrorKind::LengthMismatch => "length-mismatch",
            ErrorKind::UnresolvedReference => "unresolved-reference",
            ErrorKind::MutuallyExclusive => "mutually-exclusive-property-violation",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("unknown component type `{0}`")]
    UnknownType(String),

    #[error("{node}.{name}: {issue}")]
    InvalidProperty {
        node: &'static str,
        name: String,
        issue: PropertyIssue,
    },

    #[error("{child} is not allowed inside {parent}")]
    InvalidParentChild { parent: NodeType, child: NodeType },

    #[error("scene root must be a View, found {0}")]
    RootNotView(NodeType),

    #[error("{parent} accepts at most {max} child node(s), found {found}")]
    ChildLimit {
        parent: NodeType,
        max: usize,
        found: usize,
    },

    #[error("{container} registers `{registration}` twice (`{first}` and `{second}`)")]
    DuplicateRegistration {
        container: NodeType,
        registration: String,
        first: String,
        second: String,
    },

    #[error("length mismatch in {what}: {detail}")]
    LengthMismatch { what: String, detail: String },

    #[error("no node with id {0}")]
    NoSuchNode(NodeID),

    #[error("no ShareDataSet declares `{0}`")]
    UnresolvedReference(String),

    #[error("ShareDataSet `{name}` is declared {count} times")]
    AmbiguousReference { name: String, count: usize },

    #[error("{node}: `{first}` and `{second}` are mutually exclusive ({group})")]
    MutuallyExclusive {
        node: &'static str,
        group: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("{path}: {source}")]
    At {
        path: String,
        #[source]
        source: Box<SceneError>,
    },
}

impl SceneError {
    pub(crate) fn property(node: &'static str, name: impl Into<String>, issue: PropertyIssue) -> Self {
        SceneError::InvalidProperty {
            node,
            name: name.into(),
            issue,
        }
    }

    pub(crate) fn length(what: impl Into<String>, detail: impl Into<String>) -> Self {
        SceneError::LengthMismatch {
            what: what.into(),
            detail: detail.into(),
        }
    }

    /// Prefixes the node path with one more segment.
    pub(crate) fn within(self, segment: &str) -> Self {
        match self {
            SceneError::At { path, source } => SceneError::At {
                path: format!("{segment}/{path}"),
                source,
            },
            other => SceneError::At {
                path: segment.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// Error with any path wrapping removed.
    pub fn innermost(&self) -> &SceneError {
        match self {
            SceneError::At { source, .. } => source.innermost(),
            other => other,
        }
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            SceneError::At { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self.innermost() {
            SceneError::UnknownType(_) => ErrorKind::UnknownType,
            SceneError::InvalidProperty { .. } => ErrorKind::InvalidProperty,
            SceneError::InvalidParentChild { .. }
            | SceneError::RootNotView(_)
            | SceneError::ChildLimit { .. } => ErrorKind::InvalidParentChild,
            SceneError::DuplicateRegistration { registration, .. } => {
                if registration == SCALARS_REGISTRATION {
                    ErrorKind::DuplicateScalarRegistration
                } else {
                    ErrorKind::DuplicateRegistration
                }
            }
            SceneError::LengthMismatch { .. } => ErrorKind::LengthMismatch,
            SceneError::UnresolvedReference(_)
            | SceneError::AmbiguousReference { .. }
            | SceneError::NoSuchNode(_) => {
                ErrorKind::UnresolvedReference
            }
            SceneError::MutuallyExclusive { .. } => ErrorKind::MutuallyExclusive,
            SceneError::At { .. } => ErrorKind::InvalidProperty,
        }
    }
}

/// Syntax error in `.vtks` text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub(crate) fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{path}: {message}")]
    Shape { path: String, message: String },
    #[error(transparent)]
    Scene(#[from] SceneError),
}
