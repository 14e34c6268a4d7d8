//! English inflection for collection and type names.
//!
//! Link descriptors name a singular type (`"user"`) while linked collections
//! are plural (`"users"`), and resource kinds are derived from collection
//! names (`"blog_posts"` -> `"BlogPost"`). The rules below cover regular
//! English plus the usual irregular and uncountable words.

/// Words whose singular and plural forms are identical.
const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "jeans",
    "police",
    "news",
];

/// Irregular `(singular, plural)` pairs.
const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("sex", "sexes"),
    ("move", "moves"),
    ("zombie", "zombies"),
    ("ox", "oxen"),
    ("mouse", "mice"),
    ("louse", "lice"),
];

/// Return the plural form of `word`.
///
/// Words that already look plural are returned unchanged, so
/// `pluralize("comments") == "comments"`.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() || is_uncountable(word) {
        return word.to_string();
    }
    let lower = word.to_ascii_lowercase();
    for (singular, plural) in IRREGULAR {
        if lower == *plural {
            return word.to_string();
        }
        if lower == *singular {
            return match_case(word, plural);
        }
    }

    let ends = |suffix: &str| lower.ends_with(suffix);

    if ends("quiz") {
        return replace_suffix(word, 0, "zes");
    }
    if ends("matrix") || ends("vertex") || ends("index") {
        return replace_suffix(word, 2, "ices");
    }
    if ends("x") || ends("ch") || ends("ss") || ends("sh") {
        return replace_suffix(word, 0, "es");
    }
    if ends("y") && (ends("quy") || !is_vowel_before(&lower, 1)) {
        return replace_suffix(word, 1, "ies");
    }
    if ends("hive") {
        return replace_suffix(word, 0, "s");
    }
    if ends("fe") && !ends("ffe") {
        return replace_suffix(word, 2, "ves");
    }
    if ends("lf") || ends("rf") {
        return replace_suffix(word, 1, "ves");
    }
    if ends("sis") {
        return replace_suffix(word, 2, "es");
    }
    if ends("ta") || ends("ia") {
        return word.to_string();
    }
    if ends("tum") || ends("ium") {
        return replace_suffix(word, 2, "a");
    }
    if ends("buffalo") || ends("tomato") {
        return replace_suffix(word, 0, "es");
    }
    if ends("bus") || ends("alias") || ends("status") {
        return replace_suffix(word, 0, "es");
    }
    if ends("octopi") || ends("viri") {
        return word.to_string();
    }
    if ends("octopus") || ends("virus") {
        return replace_suffix(word, 2, "i");
    }
    if ends("axis") || ends("testis") {
        return replace_suffix(word, 2, "es");
    }
    if ends("s") {
        return word.to_string();
    }
    replace_suffix(word, 0, "s")
}

/// Return the singular form of `word`.
///
/// Words that already look singular are returned unchanged.
pub fn singularize(word: &str) -> String {
    if word.is_empty() || is_uncountable(word) {
        return word.to_string();
    }
    let lower = word.to_ascii_lowercase();
    for (singular, plural) in IRREGULAR {
        if lower == *singular {
            return word.to_string();
        }
        if lower == *plural {
            return match_case(word, singular);
        }
    }

    let ends = |suffix: &str| lower.ends_with(suffix);

    if ends("databases") {
        return replace_suffix(word, 1, "");
    }
    if ends("quizzes") {
        return replace_suffix(word, 3, "");
    }
    if ends("matrices") {
        return replace_suffix(word, 3, "x");
    }
    if ends("vertices") || ends("indices") {
        return replace_suffix(word, 4, "ex");
    }
    if ends("aliases") || ends("statuses") {
        return replace_suffix(word, 2, "");
    }
    if ends("alias") || ends("status") {
        return word.to_string();
    }
    if ends("octopi") || ends("viri") {
        return replace_suffix(word, 1, "us");
    }
    if ends("octopus") || ends("virus") {
        return word.to_string();
    }
    if lower == "axes" || lower == "axis" {
        return replace_suffix(word, 2, "is");
    }
    if ends("crises") || ends("testes") {
        return replace_suffix(word, 2, "is");
    }
    if ends("shoes") {
        return replace_suffix(word, 1, "");
    }
    if ends("oes") {
        return replace_suffix(word, 2, "");
    }
    if ends("buses") {
        return replace_suffix(word, 2, "");
    }
    if ends("bus") {
        return word.to_string();
    }
    if ends("xes") || ends("ches") || ends("sses") || ends("shes") {
        return replace_suffix(word, 2, "");
    }
    if ends("movies") {
        return replace_suffix(word, 1, "");
    }
    if ends("ies") && (ends("quies") || !is_vowel_before(&lower, 3)) {
        return replace_suffix(word, 3, "y");
    }
    if ends("lves") || ends("rves") {
        return replace_suffix(word, 3, "f");
    }
    if ends("tives") || ends("hives") {
        return replace_suffix(word, 1, "");
    }
    if ends("ves") && !ends("fves") {
        return replace_suffix(word, 3, "fe");
    }
    if ends("ses") {
        for stem in ["analy", "ba", "diagno", "parenthe", "progno", "synop", "the"] {
            if lower.ends_with(&format!("{stem}ses")) {
                return replace_suffix(word, 2, "is");
            }
        }
    }
    if ends("sis") {
        return word.to_string();
    }
    if ends("ta") || ends("ia") {
        return replace_suffix(word, 1, "um");
    }
    if ends("ss") {
        return word.to_string();
    }
    if ends("s") {
        return replace_suffix(word, 1, "");
    }
    word.to_string()
}

/// Upper-camel-case a snake, kebab or space separated name.
pub fn camelize(word: &str) -> String {
    word.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Derive a resource kind from a collection name (`"blog_posts"` -> `"BlogPost"`).
pub fn classify(collection: &str) -> String {
    camelize(&singularize(collection))
}

fn is_uncountable(word: &str) -> bool {
    let lower = word.to_ascii_lowercase();
    UNCOUNTABLE
        .iter()
        .any(|u| lower == *u || lower.ends_with(&format!("_{u}")))
}

/// True when the byte just before the last `offset` bytes is a vowel.
fn is_vowel_before(lower: &str, offset: usize) -> bool {
    lower
        .len()
        .checked_sub(offset + 1)
        .and_then(|i| lower.as_bytes().get(i))
        .map(|b| matches!(b, b'a' | b'e' | b'i' | b'o' | b'u' | b'y'))
        .unwrap_or(false)
}

fn replace_suffix(word: &str, cut: usize, append: &str) -> String {
    let mut out = String::with_capacity(word.len() + append.len());
    out.push_str(&word[..word.len() - cut]);
    out.push_str(append);
    out
}

/// Keep the capitalization of the first letter when swapping a whole word.
fn match_case(original: &str, replacement: &str) -> String {
    if original.starts_with(|c: char| c.is_uppercase()) {
        camelize(replacement)
    } else {
        replacement.to_string()
    }
}
