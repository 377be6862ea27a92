//! Entity Escaping
//!
//! Named-entity escaping with an HTML 4.01 table and an HTML5 table. The
//! HTML5 table covers the full WHATWG name set, ASCII punctuation included,
//! so text run through it comes out as `&lt;Foo&sol;&gt;` rather than
//! `&lt;Foo/&gt;`, and a check mark as `&check;`.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use crate::html5_entities::HTML5_ENTITIES;
use crate::options::{EntityFlags, QuoteStyle};

/// Named entities of HTML 4.01, minus the four markup-significant ones
const HTML401_ENTITIES: &[(char, &str)] = &[
    ('\u{a0}', "nbsp"), ('\u{a1}', "iexcl"), ('\u{a2}', "cent"), ('\u{a3}', "pound"),
    ('\u{a4}', "curren"), ('\u{a5}', "yen"), ('\u{a6}', "brvbar"), ('\u{a7}', "sect"),
    ('\u{a8}', "uml"), ('\u{a9}', "copy"), ('\u{aa}', "ordf"), ('\u{ab}', "laquo"),
    ('\u{ac}', "not"), ('\u{ad}', "shy"), ('\u{ae}', "reg"), ('\u{af}', "macr"),
    ('\u{b0}', "deg"), ('\u{b1}', "plusmn"), ('\u{b2}', "sup2"), ('\u{b3}', "sup3"),
    ('\u{b4}', "acute"), ('\u{b5}', "micro"), ('\u{b6}', "para"), ('\u{b7}', "middot"),
    ('\u{b8}', "cedil"), ('\u{b9}', "sup1"), ('\u{ba}', "ordm"), ('\u{bb}', "raquo"),
    ('\u{bc}', "frac14"), ('\u{bd}', "frac12"), ('\u{be}', "frac34"), ('\u{bf}', "iquest"),
    ('\u{c0}', "Agrave"), ('\u{c1}', "Aacute"), ('\u{c2}', "Acirc"), ('\u{c3}', "Atilde"),
    ('\u{c4}', "Auml"), ('\u{c5}', "Aring"), ('\u{c6}', "AElig"), ('\u{c7}', "Ccedil"),
    ('\u{c8}', "Egrave"), ('\u{c9}', "Eacute"), ('\u{ca}', "Ecirc"), ('\u{cb}', "Euml"),
    ('\u{cc}', "Igrave"), ('\u{cd}', "Iacute"), ('\u{ce}', "Icirc"), ('\u{cf}', "Iuml"),
    ('\u{d0}', "ETH"), ('\u{d1}', "Ntilde"), ('\u{d2}', "Ograve"), ('\u{d3}', "Oacute"),
    ('\u{d4}', "Ocirc"), ('\u{d5}', "Otilde"), ('\u{d6}', "Ouml"), ('\u{d7}', "times"),
    ('\u{d8}', "Oslash"), ('\u{d9}', "Ugrave"), ('\u{da}', "Uacute"), ('\u{db}', "Ucirc"),
    ('\u{dc}', "Uuml"), ('\u{dd}', "Yacute"), ('\u{de}', "THORN"), ('\u{df}', "szlig"),
    ('\u{e0}', "agrave"), ('\u{e1}', "aacute"), ('\u{e2}', "acirc"), ('\u{e3}', "atilde"),
    ('\u{e4}', "auml"), ('\u{e5}', "aring"), ('\u{e6}', "aelig"), ('\u{e7}', "ccedil"),
    ('\u{e8}', "egrave"), ('\u{e9}', "eacute"), ('\u{ea}', "ecirc"), ('\u{eb}', "euml"),
    ('\u{ec}', "igrave"), ('\u{ed}', "iacute"), ('\u{ee}', "icirc"), ('\u{ef}', "iuml"),
    ('\u{f0}', "eth"), ('\u{f1}', "ntilde"), ('\u{f2}', "ograve"), ('\u{f3}', "oacute"),
    ('\u{f4}', "ocirc"), ('\u{f5}', "otilde"), ('\u{f6}', "ouml"), ('\u{f7}', "divide"),
    ('\u{f8}', "oslash"), ('\u{f9}', "ugrave"), ('\u{fa}', "uacute"), ('\u{fb}', "ucirc"),
    ('\u{fc}', "uuml"), ('\u{fd}', "yacute"), ('\u{fe}', "thorn"), ('\u{ff}', "yuml"),
    ('\u{152}', "OElig"), ('\u{153}', "oelig"), ('\u{160}', "Scaron"), ('\u{161}', "scaron"),
    ('\u{178}', "Yuml"), ('\u{192}', "fnof"), ('\u{2c6}', "circ"), ('\u{2dc}', "tilde"),
    ('\u{391}', "Alpha"), ('\u{392}', "Beta"), ('\u{393}', "Gamma"), ('\u{394}', "Delta"),
    ('\u{395}', "Epsilon"), ('\u{396}', "Zeta"), ('\u{397}', "Eta"), ('\u{398}', "Theta"),
    ('\u{399}', "Iota"), ('\u{39a}', "Kappa"), ('\u{39b}', "Lambda"), ('\u{39c}', "Mu"),
    ('\u{39d}', "Nu"), ('\u{39e}', "Xi"), ('\u{39f}', "Omicron"), ('\u{3a0}', "Pi"),
    ('\u{3a1}', "Rho"), ('\u{3a3}', "Sigma"), ('\u{3a4}', "Tau"), ('\u{3a5}', "Upsilon"),
    ('\u{3a6}', "Phi"), ('\u{3a7}', "Chi"), ('\u{3a8}', "Psi"), ('\u{3a9}', "Omega"),
    ('\u{3b1}', "alpha"), ('\u{3b2}', "beta"), ('\u{3b3}', "gamma"), ('\u{3b4}', "delta"),
    ('\u{3b5}', "epsilon"), ('\u{3b6}', "zeta"), ('\u{3b7}', "eta"), ('\u{3b8}', "theta"),
    ('\u{3b9}', "iota"), ('\u{3ba}', "kappa"), ('\u{3bb}', "lambda"), ('\u{3bc}', "mu"),
    ('\u{3bd}', "nu"), ('\u{3be}', "xi"), ('\u{3bf}', "omicron"), ('\u{3c0}', "pi"),
    ('\u{3c1}', "rho"), ('\u{3c2}', "sigmaf"), ('\u{3c3}', "sigma"), ('\u{3c4}', "tau"),
    ('\u{3c5}', "upsilon"), ('\u{3c6}', "phi"), ('\u{3c7}', "chi"), ('\u{3c8}', "psi"),
    ('\u{3c9}', "omega"), ('\u{3d1}', "thetasym"), ('\u{3d2}', "upsih"), ('\u{3d6}', "piv"),
    ('\u{2002}', "ensp"), ('\u{2003}', "emsp"), ('\u{2009}', "thinsp"), ('\u{200c}', "zwnj"),
    ('\u{200d}', "zwj"), ('\u{200e}', "lrm"), ('\u{200f}', "rlm"), ('\u{2013}', "ndash"),
    ('\u{2014}', "mdash"), ('\u{2018}', "lsquo"), ('\u{2019}', "rsquo"), ('\u{201a}', "sbquo"),
    ('\u{201c}', "ldquo"), ('\u{201d}', "rdquo"), ('\u{201e}', "bdquo"), ('\u{2020}', "dagger"),
    ('\u{2021}', "Dagger"), ('\u{2022}', "bull"), ('\u{2026}', "hellip"), ('\u{2030}', "permil"),
    ('\u{2032}', "prime"), ('\u{2033}', "Prime"), ('\u{2039}', "lsaquo"), ('\u{203a}', "rsaquo"),
    ('\u{203e}', "oline"), ('\u{2044}', "frasl"), ('\u{20ac}', "euro"), ('\u{2111}', "image"),
    ('\u{2118}', "weierp"), ('\u{211c}', "real"), ('\u{2122}', "trade"), ('\u{2135}', "alefsym"),
    ('\u{2190}', "larr"), ('\u{2191}', "uarr"), ('\u{2192}', "rarr"), ('\u{2193}', "darr"),
    ('\u{2194}', "harr"), ('\u{21b5}', "crarr"), ('\u{21d0}', "lArr"), ('\u{21d1}', "uArr"),
    ('\u{21d2}', "rArr"), ('\u{21d3}', "dArr"), ('\u{21d4}', "hArr"), ('\u{2200}', "forall"),
    ('\u{2202}', "part"), ('\u{2203}', "exist"), ('\u{2205}', "empty"), ('\u{2207}', "nabla"),
    ('\u{2208}', "isin"), ('\u{2209}', "notin"), ('\u{220b}', "ni"), ('\u{220f}', "prod"),
    ('\u{2211}', "sum"), ('\u{2212}', "minus"), ('\u{2217}', "lowast"), ('\u{221a}', "radic"),
    ('\u{221d}', "prop"), ('\u{221e}', "infin"), ('\u{2220}', "ang"), ('\u{2227}', "and"),
    ('\u{2228}', "or"), ('\u{2229}', "cap"), ('\u{222a}', "cup"), ('\u{222b}', "int"),
    ('\u{2234}', "there4"), ('\u{223c}', "sim"), ('\u{2245}', "cong"), ('\u{2248}', "asymp"),
    ('\u{2260}', "ne"), ('\u{2261}', "equiv"), ('\u{2264}', "le"), ('\u{2265}', "ge"),
    ('\u{2282}', "sub"), ('\u{2283}', "sup"), ('\u{2284}', "nsub"), ('\u{2286}', "sube"),
    ('\u{2287}', "supe"), ('\u{2295}', "oplus"), ('\u{2297}', "otimes"), ('\u{22a5}', "perp"),
    ('\u{22c5}', "sdot"), ('\u{2308}', "lceil"), ('\u{2309}', "rceil"), ('\u{230a}', "lfloor"),
    ('\u{230b}', "rfloor"), ('\u{2329}', "lang"), ('\u{232a}', "rang"), ('\u{25ca}', "loz"),
    ('\u{2660}', "spades"), ('\u{2663}', "clubs"), ('\u{2665}', "hearts"), ('\u{2666}', "diams"),
];

/// Preferred HTML5 names, taking precedence over the other WHATWG aliases
const HTML5_PREFERRED_ENTITIES: &[(char, &str)] = &[
    ('\t', "Tab"), ('\n', "NewLine"), ('!', "excl"), ('#', "num"), ('$', "dollar"),
    ('%', "percnt"), ('(', "lpar"), (')', "rpar"), ('*', "ast"), ('+', "plus"),
    (',', "comma"), ('.', "period"), ('/', "sol"), (':', "colon"), (';', "semi"),
    ('=', "equals"), ('?', "quest"), ('@', "commat"), ('[', "lbrack"), ('\\', "bsol"),
    (']', "rbrack"), ('^', "Hat"), ('_', "lowbar"), ('`', "grave"), ('{', "lbrace"),
    ('|', "vert"), ('}', "rbrace"), ('\u{2010}', "hyphen"), ('\u{27e8}', "lang"),
    ('\u{27e9}', "rang"),
];

/// Legacy code points whose HTML 4.01 name moved to another code point in HTML5
const HTML5_DROPPED: &[char] = &['\u{2329}', '\u{232a}'];

/// Escaped by dedicated rules before any table lookup
const MARKUP_SIGNIFICANT: &[char] = &['&', '<', '>', '"', '\''];

struct EntityTable {
    by_char: HashMap<char, &'static str>,
    names: HashSet<&'static str>,
}

impl EntityTable {
    fn build(html5: bool) -> Self {
        let mut by_char: HashMap<char, &'static str> = HTML401_ENTITIES.iter().copied().collect();
        let mut names: HashSet<&'static str> = HTML401_ENTITIES.iter().map(|(_, n)| *n).collect();
        names.extend(["quot", "amp", "lt", "gt"]);

        if html5 {
            for c in HTML5_DROPPED {
                by_char.remove(c);
            }
            for &(c, name) in HTML5_PREFERRED_ENTITIES {
                by_char.insert(c, name);
            }

            // Remaining code points take their shortest name, ties broken by name
            let mut aliases: HashMap<char, &'static str> = HashMap::new();
            for &(name, expansion) in HTML5_ENTITIES {
                names.insert(name);

                let mut chars = expansion.chars();
                let (Some(c), None) = (chars.next(), chars.next()) else {
                    continue;
                };
                if by_char.contains_key(&c) || MARKUP_SIGNIFICANT.contains(&c) {
                    continue;
                }
                aliases
                    .entry(c)
                    .and_modify(|current| {
                        if (name.len(), name) < (current.len(), *current) {
                            *current = name;
                        }
                    })
                    .or_insert(name);
            }
            by_char.extend(aliases);
        }

        Self { by_char, names }
    }
}

static HTML401: LazyLock<EntityTable> = LazyLock::new(|| EntityTable::build(false));
static HTML5: LazyLock<EntityTable> = LazyLock::new(|| EntityTable::build(true));

/// Escape `text` for HTML.
///
/// With `double_encode` off, an `&` that already starts a valid reference is
/// copied through unchanged.
pub fn encode(text: &str, flags: &EntityFlags, double_encode: bool) -> String {
    let table: &EntityTable = if flags.html5 { &HTML5 } else { &HTML401 };
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    let mut chars = text.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '&' => {
                let existing = if double_encode {
                    None
                } else {
                    reference_len(&text[i..], table)
                };
                match existing {
                    Some(len) => {
                        out.push_str(&text[i..i + len]);
                        // Everything after '&' in a reference is ASCII
                        for _ in 1..len {
                            chars.next();
                        }
                    }
                    None => out.push_str("&amp;"),
                }
            }
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if flags.quotes != QuoteStyle::None => out.push_str("&quot;"),
            '\'' if flags.quotes == QuoteStyle::Both => {
                out.push_str(if flags.html5 { "&apos;" } else { "&#039;" })
            }
            '"' | '\'' => out.push(c),
            _ => match table.by_char.get(&c) {
                Some(name) => {
                    out.push('&');
                    out.push_str(name);
                    out.push(';');
                }
                None => out.push(c),
            },
        }
    }

    out
}

/// Escape raw bytes, decoding them as UTF-8 first.
///
/// Invalid sequences become U+FFFD when `substitute_invalid` is set; otherwise
/// the whole input is rejected and an empty string comes back.
pub fn encode_bytes(bytes: &[u8], flags: &EntityFlags, double_encode: bool) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => encode(text, flags, double_encode),
        Err(_) if flags.substitute_invalid => {
            encode(&String::from_utf8_lossy(bytes), flags, double_encode)
        }
        Err(e) => {
            tracing::debug!("Rejecting invalid UTF-8 input: {}", e);
            String::new()
        }
    }
}

/// Length of the character reference starting at `s[0] == '&'`, if it is one
fn reference_len(s: &str, table: &EntityTable) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.get(1) == Some(&b'#') {
        let (start, radix) = match bytes.get(2) {
            Some(b'x' | b'X') => (3, 16),
            _ => (2, 10),
        };
        let digits = bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit() || (radix == 16 && b.is_ascii_hexdigit()))
            .count();
        if digits == 0 || bytes.get(start + digits) != Some(&b';') {
            return None;
        }
        let code = u32::from_str_radix(&s[start..start + digits], radix).ok()?;
        (code <= 0x10FFFF).then_some(start + digits + 1)
    } else {
        let name_len = bytes[1..].iter().take_while(|b| b.is_ascii_alphanumeric()).count();
        if name_len == 0 || bytes.get(1 + name_len) != Some(&b';') {
            return None;
        }
        table
            .names
            .contains(&s[1..1 + name_len])
            .then_some(name_len + 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html5() -> EntityFlags {
        EntityFlags::default()
    }

    fn html401() -> EntityFlags {
        EntityFlags::default().toggle_html5()
    }

    #[test]
    fn test_html5_text() {
        assert_eq!(encode("<Foo/>", &html5(), false), "&lt;Foo&sol;&gt;");
        assert_eq!(encode("\"Foo\"", &html5(), false), "&quot;Foo&quot;");
        assert_eq!(encode("it's", &html5(), false), "it&apos;s");
        assert_eq!(encode("a: b", &html5(), false), "a&colon; b");
        assert_eq!(encode("caf\u{e9}", &html5(), false), "caf&eacute;");
    }

    #[test]
    fn test_html401_leaves_punctuation() {
        assert_eq!(encode("<Foo/>", &html401(), false), "&lt;Foo/&gt;");
        assert_eq!(encode("font-weight:bolder;", &html401(), false), "font-weight:bolder;");
        assert_eq!(encode("it's", &html401(), false), "it&#039;s");
        assert_eq!(encode("\u{a9} 2024", &html401(), false), "&copy; 2024");
    }

    #[test]
    fn test_quote_styles() {
        let mut flags = html401();
        flags.quotes = QuoteStyle::Double;
        assert_eq!(encode("\"'", &flags, false), "&quot;'");
        flags.quotes = QuoteStyle::None;
        assert_eq!(encode("\"'", &flags, false), "\"'");
    }

    #[test]
    fn test_double_encode() {
        assert_eq!(encode("&", &html5(), false), "&amp;");
        assert_eq!(encode("&amp;", &html5(), false), "&amp;");
        assert_eq!(encode("&amp;", &html401(), true), "&amp;amp;");
        assert_eq!(encode("&amp;", &html5(), true), "&amp;amp&semi;");
        assert_eq!(encode("&#169; &#xA9;", &html5(), false), "&#169; &#xA9;");
        assert_eq!(encode("&#;", &html5(), false), "&amp;&num;&semi;");
        assert_eq!(encode("&bogus;", &html401(), false), "&amp;bogus;");
        assert_eq!(encode("&#x110000;", &html401(), false), "&amp;#x110000;");
    }

    #[test]
    fn test_html5_names_beyond_html401() {
        assert_eq!(encode("\u{2713}", &html5(), false), "&check;");
        assert_eq!(encode("\u{2713}", &html401(), false), "\u{2713}");
        assert_eq!(encode("\u{2260}", &html5(), false), "&ne;");
        assert_eq!(encode("\u{27e8}x\u{27e9}", &html5(), false), "&lang;x&rang;");
    }

    #[test]
    fn test_html5_references_are_kept() {
        assert_eq!(encode("&check; &checkmark;", &html5(), false), "&check; &checkmark;");
        assert_eq!(encode("&NotEqualTilde;", &html5(), false), "&NotEqualTilde;");
        assert_eq!(encode("&check;", &html401(), false), "&amp;check;");
    }

    #[test]
    fn test_apos_is_html5_only() {
        assert_eq!(encode("&apos;", &html5(), false), "&apos;");
        assert_eq!(encode("&apos;", &html401(), false), "&amp;apos;");
    }

    #[test]
    fn test_encode_bytes() {
        let mut flags = html5();
        assert_eq!(encode_bytes(b"a\xffb", &flags, false), "a\u{fffd}b");
        flags.substitute_invalid = false;
        assert_eq!(encode_bytes(b"a\xffb", &flags, false), "");
        assert_eq!(encode_bytes(b"ab", &flags, false), "ab");
    }
}
