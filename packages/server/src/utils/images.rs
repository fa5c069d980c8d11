/// Helpers for the grid UI: card art lookup paths and avatar initials.
/// Card art is pre-downloaded into `public/cards/` by an external script;
/// the server only derives candidate paths.

/// Lowercase, fold French diacritics, collapse everything else to `-`.
pub fn slugify_card_name(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.to_lowercase().chars() {
        let folded = fold_diacritic(c);
        if folded.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(folded);
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'â' | 'ä' | 'á' | 'ã' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'î' | 'ï' | 'í' => 'i',
        'ô' | 'ö' | 'ó' | 'õ' => 'o',
        'ù' | 'û' | 'ü' | 'ú' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

/// Candidate art locations for a card, in lookup order.
pub fn candidate_image_urls(name: &str) -> Vec<String> {
    vec![format!("/cards/{}.webp", slugify_card_name(name))]
}

/// Placeholder initials shown when no art is available.
pub fn initials_from_name(name: &str) -> String {
    let mut words = name.split_whitespace();
    let a = words.next().and_then(|w| w.chars().next());
    let b = words.next().and_then(|w| w.chars().next());
    a.into_iter()
        .chain(b)
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_folds_accents_and_collapses_separators() {
        assert_eq!(slugify_card_name("Épée de l'Aube"), "epee-de-l-aube");
        assert_eq!(slugify_card_name("Jinx"), "jinx");
        assert_eq!(slugify_card_name("  Miss   Fortune!  "), "miss-fortune");
    }

    #[test]
    fn candidate_urls_point_at_local_art() {
        assert_eq!(candidate_image_urls("Légendaire"), ["/cards/legendaire.webp"]);
    }

    #[test]
    fn initials_take_first_two_words() {
        assert_eq!(initials_from_name("Miss Fortune"), "MF");
        assert_eq!(initials_from_name("Jinx"), "J");
        assert_eq!(initials_from_name(""), "");
    }
}
