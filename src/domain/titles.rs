use anyhow::{bail, Result};
use std::collections::HashMap;

/// Titles Box Office Mojo spells differently from TMDB.
const BUILTIN_OVERRIDES: [(&str, &str); 2] = [
    ("Three Men And a Baby", "3 Men and a Baby"),
    ("9 to 5", "Nine to Five"),
];

#[derive(Debug, Clone)]
pub struct TitleNormalizer {
    overrides: HashMap<String, String>,
}

impl Default for TitleNormalizer {
    fn default() -> Self {
        Self {
            overrides: BUILTIN_OVERRIDES
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }
}

impl TitleNormalizer {
    /// Built-in table plus `extra`, with `extra` winning on conflicts.
    ///
    /// Fails if a target title is itself rewritten to something else, since
    /// normalizing would then depend on how many times it is applied.
    pub fn with_overrides<I>(extra: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut normalizer = Self::default();
        normalizer.overrides.extend(extra);

        for (from, to) in &normalizer.overrides {
            if let Some(next) = normalizer.overrides.get(to) {
                if next != to {
                    bail!(
                        "Title override \"{from}\" -> \"{to}\" chains into \"{to}\" -> \"{next}\""
                    );
                }
            }
        }

        Ok(normalizer)
    }

    pub fn normalize(&self, title: &str) -> String {
        self.overrides
            .get(title)
            .cloned()
            .unwrap_or_else(|| title.to_string())
    }
}

/// Pull the title column out of a tab-separated listing.
///
/// The first line is a header. An empty line ends the data.
pub fn extract_titles(content: &str, normalizer: &TitleNormalizer) -> Result<Vec<String>> {
    let mut titles = Vec::new();

    for (idx, line) in content.lines().enumerate().skip(1) {
        if line.is_empty() {
            break;
        }
        let Some(title) = line.split('\t').nth(1) else {
            bail!(
                "Malformed listing row at line {}: expected at least 2 tab-separated fields",
                idx + 1
            );
        };
        titles.push(normalizer.normalize(title));
    }

    Ok(titles)
}
