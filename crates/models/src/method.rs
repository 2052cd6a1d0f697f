use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::NormalizeError;

/// HTTP methods a mock endpoint may answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive: `get`, `Get` and `GET` all parse to `Method::Get`.
impl FromStr for Method {
    type Err = NormalizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            _ => Err(NormalizeError::InvalidMethod(s.to_string())),
        }
    }
}

impl Serialize for Method {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Method {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_any_case() {
        for raw in ["get", "Get", "GET", "gEt"] {
            assert_eq!(raw.parse::<Method>().unwrap(), Method::Get);
        }
        assert_eq!("delete".parse::<Method>().unwrap(), Method::Delete);
    }

    #[test]
    fn rejects_unknown_methods() {
        let err = "HEAD".parse::<Method>().unwrap_err();
        assert_eq!(err, NormalizeError::InvalidMethod("HEAD".into()));
        assert!("OPTIONS".parse::<Method>().is_err());
        assert!("".parse::<Method>().is_err());
    }

    #[test]
    fn serializes_uppercase() {
        let json = serde_json::to_string(&Method::Patch).unwrap();
        assert_eq!(json, "\"PATCH\"");
    }
}
