//! Skin affiliation: split a compound listing name into (item, skin).
//!
//! Strategies are tried in order and the first hit wins:
//! 1. trailing or leading word run equal to a known item's words
//! 2. ordered (not necessarily contiguous) subsequence of an item's words
//! 3. reverse lookup against the info source's explicit skin lists
//!
//! Candidates are tried most-words first so "East Dragon" beats "Dragon".

use std::collections::{HashMap, HashSet};

use crate::alias::AliasTable;
use crate::model::InfoFruit;
use crate::normalize::{normalize_words, pretty_from_key, words};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Suffix,
    Prefix,
    Subsequence,
    ReverseIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Affiliation {
    /// Display name of the owning item as known to the sources.
    pub owner: String,
    /// Canonical bucket key of the owner (aliases applied).
    pub owner_key: String,
    /// Residual skin display name.
    pub skin: String,
    pub strategy: Strategy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(Affiliation),
    Unresolved,
}

#[derive(Debug, Clone)]
struct Candidate {
    name: String,
    words: Vec<String>,
}

pub struct SkinResolver<'a> {
    candidates: Vec<Candidate>,
    /// normalized-words skin name -> owning bucket key
    reverse: HashMap<String, String>,
    aliases: &'a AliasTable,
}

impl<'a> SkinResolver<'a> {
    /// `item_names` is every known top-level display name, in source order.
    pub fn new(item_names: &[String], info: &[InfoFruit], aliases: &'a AliasTable) -> Self {
        let mut seen = HashSet::new();
        let mut candidates: Vec<Candidate> = item_names
            .iter()
            .filter(|n| seen.insert(n.as_str()))
            .map(|n| Candidate {
                name: n.clone(),
                words: words(n),
            })
            .filter(|c| !c.words.is_empty())
            .collect();
        candidates.sort_by(|a, b| {
            b.words
                .len()
                .cmp(&a.words.len())
                .then_with(|| b.name.chars().count().cmp(&a.name.chars().count()))
        });

        let mut reverse = HashMap::new();
        for fruit in info {
            let Some(ref fruit_name) = fruit.name else {
                continue;
            };
            let fruit_key = aliases.canonical_key(fruit_name);
            for skin in &fruit.skins {
                if let Some(ref skin_name) = skin.name {
                    reverse.insert(normalize_words(skin_name), fruit_key.clone());
                }
            }
        }

        Self {
            candidates,
            reverse,
            aliases,
        }
    }

    pub fn resolve(&self, compound: &str) -> Resolution {
        let compound = compound.trim();
        if compound.is_empty() {
            return Resolution::Unresolved;
        }

        let tokens: Vec<(&str, Vec<String>)> =
            compound.split_whitespace().map(|t| (t, words(t))).collect();
        // Flattened words, each tagged with the raw token it came from.
        let flat: Vec<(&str, usize)> = tokens
            .iter()
            .enumerate()
            .flat_map(|(ti, (_, ws))| ws.iter().map(move |w| (w.as_str(), ti)))
            .collect();

        for cand in &self.candidates {
            let n = cand.words.len();
            if n > flat.len() {
                continue;
            }
            let tail = flat.len() - n;
            if flat[tail..].iter().map(|(w, _)| *w).eq(cand.words.iter().map(String::as_str)) {
                let matched: Vec<usize> = (tail..flat.len()).collect();
                return self.affiliate(cand, compound, &tokens, &flat, &matched, Strategy::Suffix);
            }
            if flat[..n].iter().map(|(w, _)| *w).eq(cand.words.iter().map(String::as_str)) {
                let matched: Vec<usize> = (0..n).collect();
                return self.affiliate(cand, compound, &tokens, &flat, &matched, Strategy::Prefix);
            }
        }

        for cand in &self.candidates {
            if let Some(matched) = first_subsequence(&flat, &cand.words) {
                return self.affiliate(
                    cand,
                    compound,
                    &tokens,
                    &flat,
                    &matched,
                    Strategy::Subsequence,
                );
            }
        }

        if let Some(owner_key) = self.reverse.get(&normalize_words(compound)) {
            let owner = self
                .candidates
                .iter()
                .find(|c| self.aliases.canonical_key(&c.name) == *owner_key)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| pretty_from_key(owner_key));
            return Resolution::Resolved(Affiliation {
                owner,
                owner_key: owner_key.clone(),
                skin: compound.to_string(),
                strategy: Strategy::ReverseIndex,
            });
        }

        Resolution::Unresolved
    }

    fn affiliate(
        &self,
        cand: &Candidate,
        compound: &str,
        tokens: &[(&str, Vec<String>)],
        flat: &[(&str, usize)],
        matched: &[usize],
        strategy: Strategy,
    ) -> Resolution {
        Resolution::Resolved(Affiliation {
            owner: cand.name.clone(),
            owner_key: self.aliases.canonical_key(&cand.name),
            skin: residual(compound, tokens, flat, matched),
            strategy,
        })
    }
}

/// Positions of the first in-order occurrence of every word of `needle`.
fn first_subsequence(flat: &[(&str, usize)], needle: &[String]) -> Option<Vec<usize>> {
    let mut positions = Vec::with_capacity(needle.len());
    let mut next = needle.iter();
    let mut want = next.next();
    for (i, (word, _)) in flat.iter().enumerate() {
        match want {
            Some(w) if w == word => {
                positions.push(i);
                want = next.next();
            }
            Some(_) => {}
            None => break,
        }
    }
    want.is_none().then_some(positions)
}

/// Raw tokens left after dropping every token whose words were all matched.
///
/// Falls back to the whole compound name when nothing remains.
fn residual(
    compound: &str,
    tokens: &[(&str, Vec<String>)],
    flat: &[(&str, usize)],
    matched: &[usize],
) -> String {
    let mut consumed = vec![0usize; tokens.len()];
    for &pos in matched {
        consumed[flat[pos].1] += 1;
    }
    let kept: Vec<&str> = tokens
        .iter()
        .enumerate()
        .filter(|(ti, (_, ws))| ws.is_empty() || consumed[*ti] < ws.len())
        .map(|(_, (raw, _))| *raw)
        .collect();
    let skin = kept.join(" ").trim().to_string();
    if skin.is_empty() {
        compound.to_string()
    } else {
        skin
    }
}
