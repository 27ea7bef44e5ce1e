/// URL slug for a group: `name-city`, lowercased, with every run of
/// non-ASCII-alphanumeric characters collapsed to a single `-` and no leading or
/// trailing dashes.
pub fn generate_slug(name: &str, city: &str) -> String {
    let mut slug = String::with_capacity(name.len() + city.len() + 1);
    let mut pending_dash = false;

    for ch in name.chars().chain(std::iter::once('-')).chain(city.chars()) {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}
