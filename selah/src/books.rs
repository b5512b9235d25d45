//! Fixed Korean Bible book abbreviation table and lookup-key construction.
//!
//! Abbreviation is an optimization for probing the static verse table, not
//! a correctness requirement: unknown books fall back to the
//! whitespace-stripped input instead of erroring.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Full 개역개정 book name → standard abbreviation, all 66 books.
/// Immutable process-wide configuration; keyed by whitespace-stripped names.
static BOOK_ABBREVIATIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("창세기", "창"),
        ("출애굽기", "출"),
        ("레위기", "레"),
        ("민수기", "민"),
        ("신명기", "신"),
        ("여호수아", "수"),
        ("사사기", "삿"),
        ("룻기", "룻"),
        ("사무엘상", "삼상"),
        ("사무엘하", "삼하"),
        ("열왕기상", "왕상"),
        ("열왕기하", "왕하"),
        ("역대상", "대상"),
        ("역대하", "대하"),
        ("에스라", "스"),
        ("느헤미야", "느"),
        ("에스더", "에"),
        ("욥기", "욥"),
        ("시편", "시"),
        ("잠언", "잠"),
        ("전도서", "전"),
        ("아가", "아"),
        ("이사야", "사"),
        ("예레미야", "렘"),
        ("예레미야애가", "애"),
        ("에스겔", "겔"),
        ("다니엘", "단"),
        ("호세아", "호"),
        ("요엘", "욜"),
        ("아모스", "암"),
        ("오바댜", "옵"),
        ("요나", "욘"),
        ("미가", "미"),
        ("나훔", "나"),
        ("하박국", "합"),
        ("스바냐", "습"),
        ("학개", "학"),
        ("스가랴", "슥"),
        ("말라기", "말"),
        ("마태복음", "마"),
        ("마가복음", "막"),
        ("누가복음", "눅"),
        ("요한복음", "요"),
        ("사도행전", "행"),
        ("로마서", "롬"),
        ("고린도전서", "고전"),
        ("고린도후서", "고후"),
        ("갈라디아서", "갈"),
        ("에베소서", "엡"),
        ("빌립보서", "빌"),
        ("골로새서", "골"),
        ("데살로니가전서", "살전"),
        ("데살로니가후서", "살후"),
        ("디모데전서", "딤전"),
        ("디모데후서", "딤후"),
        ("디도서", "딛"),
        ("빌레몬서", "몬"),
        ("히브리서", "히"),
        ("야고보서", "약"),
        ("베드로전서", "벧전"),
        ("베드로후서", "벧후"),
        ("요한일서", "요일"),
        ("요한이서", "요이"),
        ("요한삼서", "요삼"),
        ("유다서", "유"),
        ("요한계시록", "계"),
    ])
});

fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Returns the standard abbreviation for a full book name. Never fails:
/// unrecognized books return the whitespace-stripped input unchanged.
pub fn abbreviate(book: &str) -> String {
    let stripped = strip_whitespace(book);
    match BOOK_ABBREVIATIONS.get(stripped.as_str()) {
        Some(abbr) => (*abbr).to_string(),
        None => stripped,
    }
}

/// Builds the key that probes the static verse table: the canonical
/// reference split on its first space into book/rest, the book abbreviated,
/// the rest whitespace-stripped, concatenated with no separator.
///
/// `"시편 23:1"` → `"시23:1"`.
pub fn lookup_key(canonical: &str) -> String {
    match canonical.split_once(' ') {
        Some((book, rest)) => format!("{}{}", abbreviate(book), strip_whitespace(rest)),
        None => abbreviate(canonical),
    }
}
