//! Definition of errors.

use core::fmt;

use std::error::Error;

pub type Result<T, E = MailvecError> = core::result::Result<T, E>;

#[derive(Debug)]
pub enum MailvecError {
    InvalidArgument(InvalidArgumentError),
    UnknownCharset(UnknownCharsetError),
    ParseError(mailparse::MailParseError),
    DecodeError(bincode::error::DecodeError),
    EncodeError(bincode::error::EncodeError),
    IOError(std::io::Error),
}

impl MailvecError {
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    pub(crate) fn unknown_charset<S>(label: S) -> Self
    where
        S: Into<String>,
    {
        Self::UnknownCharset(UnknownCharsetError {
            label: label.into(),
        })
    }
}

impl fmt::Display for MailvecError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidArgument(e) => e.fmt(f),
            Self::UnknownCharset(e) => e.fmt(f),
            Self::ParseError(e) => e.fmt(f),
            Self::DecodeError(e) => e.fmt(f),
            Self::EncodeError(e) => e.fmt(f),
            Self::IOError(e) => e.fmt(f),
        }
    }
}

impl Error for MailvecError {}

/// Error used when the argument is invalid.
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// Error used when a body part declares a charset no decoder is known for.
#[derive(Debug)]
pub struct UnknownCharsetError {
    /// The charset label as written in the `Content-Type` header.
    pub(crate) label: String,
}

impl fmt::Display for UnknownCharsetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "UnknownCharsetError: {}", self.label)
    }
}

impl Error for UnknownCharsetError {}

impl From<mailparse::MailParseError> for MailvecError {
    fn from(error: mailparse::MailParseError) -> Self {
        Self::ParseError(error)
    }
}

impl From<bincode::error::DecodeError> for MailvecError {
    fn from(error: bincode::error::DecodeError) -> Self {
        Self::DecodeError(error)
    }
}

impl From<bincode::error::EncodeError> for MailvecError {
    fn from(error: bincode::error::EncodeError) -> Self {
        Self::EncodeError(error)
    }
}

impl From<std::io::Error> for MailvecError {
    fn from(error: std::io::Error) -> Self {
        Self::IOError(error)
    }
}
