use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A joke as served by the remote API.
///
/// Keys match case-insensitively (`setup`, `Setup`, `SETUP`) and the last
/// occurrence wins. A missing key or a `null` value leaves the field at its
/// zero value, and unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Joke {
    pub id: u64,

    #[serde(rename = "type")]
    pub kind: String,

    pub setup: String,

    pub punchline: String,
}

impl fmt::Display for Joke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.setup, self.punchline)
    }
}

impl<'de> Deserialize<'de> for Joke {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(JokeVisitor)
    }
}

struct JokeVisitor;

impl<'de> Visitor<'de> for JokeVisitor {
    type Value = Joke;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a joke object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Joke, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut joke = Joke::default();

        while let Some(key) = map.next_key::<String>()? {
            match key.to_ascii_lowercase().as_str() {
                "id" => set_if_present(&mut joke.id, map.next_value()?),
                "type" => set_if_present(&mut joke.kind, map.next_value()?),
                "setup" => set_if_present(&mut joke.setup, map.next_value()?),
                "punchline" => set_if_present(&mut joke.punchline, map.next_value()?),
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        Ok(joke)
    }

    fn visit_unit<E>(self) -> Result<Joke, E>
    where
        E: de::Error,
    {
        // `null` in place of the object leaves every field at its zero value
        Ok(Joke::default())
    }
}

fn set_if_present<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}
