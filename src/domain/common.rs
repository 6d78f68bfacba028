/// Supplies a presentation-ready label for receipts or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Turns a wire tag such as `MASS_OFFERING` into `Mass Offering`.
pub fn humanize_tag(tag: &str) -> String {
    tag.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let mut out = String::with_capacity(word.len());
                    out.extend(first.to_uppercase());
                    out.push_str(&chars.as_str().to_lowercase());
                    out
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Treats blank optional text the same as a missing value.
pub fn present_text(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}
