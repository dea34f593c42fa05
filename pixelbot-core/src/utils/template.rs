/// Fills `{name}` placeholders. Unknown placeholders are left untouched so a
/// typo in a configured message shows up in the chat instead of vanishing.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in values {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::render;

    #[test]
    fn replaces_every_occurrence() {
        assert_eq!(render("{date} and {date}", &[("date", "01/02/2024")]), "01/02/2024 and 01/02/2024");
    }

    #[test]
    fn leaves_unknown_placeholders() {
        assert_eq!(render("{year} {x}", &[("year", "2024")]), "2024 {x}");
    }
}
