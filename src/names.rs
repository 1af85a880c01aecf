//! Naming-convention helpers: hyphenated file names vs. capitalized identifiers.

/// Converts a hyphenated directory name to a capitalized identifier.
///
/// `"bussiness-logic"` becomes `"BussinessLogic"`.
pub fn title_case(hyphenated: &str) -> String {
    hyphenated
        .split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Splits a capitalized identifier into its constituent words.
///
/// Every uppercase letter starts a new word; a word runs until the next
/// uppercase letter or the end of the string.
///
/// `"ReturnRepairPendingCollectionResult"` becomes
/// `["Return", "Repair", "Pending", "Collection", "Result"]`.
pub fn split_words(identifier: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();

    for ch in identifier.chars() {
        if ch.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
}

/// Converts a capitalized identifier back to a hyphenated lowercase file name.
///
/// Inverse of [`title_case`]: `"BussinessLogic"` becomes `"bussiness-logic"`.
pub fn to_file_name(identifier: &str) -> String {
    split_words(identifier)
        .iter()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Returns an indentation prefix of `level` spaces.
pub fn indent(level: usize) -> String {
    " ".repeat(level)
}

/// Indents every line of `text` by `level` spaces.
///
/// Lines are split on `\n` and each (including empty ones) is re-emitted with
/// a trailing newline, so the result always ends with a newline.
pub fn indent_block(text: &str, level: usize) -> String {
    let prefix = indent(level);
    text.split('\n')
        .map(|line| format!("{prefix}{line}\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("bussiness-logic"), "BussinessLogic");
        assert_eq!(title_case("pending-collection"), "PendingCollection");
        assert_eq!(title_case("models"), "Models");
    }

    #[test]
    fn test_split_words() {
        assert_eq!(
            split_words("ReturnRepairPendingCollectionResult"),
            vec!["Return", "Repair", "Pending", "Collection", "Result"]
        );
        assert_eq!(split_words("Example"), vec!["Example"]);
        assert_eq!(split_words(""), Vec::<String>::new());
    }

    #[test]
    fn test_to_file_name() {
        assert_eq!(to_file_name("BussinessLogic"), "bussiness-logic");
    }

    #[test]
    fn test_round_trip() {
        assert_eq!(title_case(&to_file_name("BussinessLogic")), "BussinessLogic");
        assert_eq!(to_file_name(&title_case("inner-bussiness")), "inner-bussiness");
    }

    #[test]
    fn test_indent_line() {
        let line = "O Rebolation, tion. O rebolation.";
        assert_eq!(format!("{}{}", indent(2), line), format!("  {line}"));
    }

    #[test]
    fn test_indent_block_multiple_lines() {
        let lines = "Rebolation é bom! Bom!\n\
                     Rebolation é bom! Bom! Bom!\n\
                     Rebolation é bom! Bom!\n\
                     Se você fizer fica melhor";

        let expected = "  Rebolation é bom! Bom!\n\
                        \x20 Rebolation é bom! Bom! Bom!\n\
                        \x20 Rebolation é bom! Bom!\n\
                        \x20 Se você fizer fica melhor\n";

        assert_eq!(indent_block(lines, 2), expected);
    }

    #[test]
    fn test_indent_block_keeps_empty_lines() {
        assert_eq!(indent_block("a\n\nb", 2), "  a\n  \n  b\n");
    }
}
