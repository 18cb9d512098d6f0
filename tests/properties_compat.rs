//! Properties format compatibility corpus
//!
//! Table of documents covering the classic properties text semantics
//! the merger must keep accepting: separators, comments,
//! continuations, escapes, and encoding.

use lane_config::properties::{decode_latin1, parse};

struct Case {
    name: &'static str,
    text: &'static str,
    expected: &'static [(&'static str, &'static str)],
}

const CASES: &[Case] = &[
    Case {
        name: "separator variants",
        text: "a=1\nb:2\nc 3\nd\t4\ne = 5\n",
        expected: &[("a", "1"), ("b", "2"), ("c", "3"), ("d", "4"), ("e", "5")],
    },
    Case {
        name: "comments and blanks",
        text: "# hash comment\n! bang comment\n\n   \nkey=value\n   # indented comment\n",
        expected: &[("key", "value")],
    },
    Case {
        name: "continuation with indented tail",
        text: "targets=ios, \\\n        mac, \\\n        watch\n",
        expected: &[("targets", "ios, mac, watch")],
    },
    Case {
        name: "escaped characters",
        text: "tabbed=a\\tb\nliteral\\ key=v\nwindows=c\\:\\\\lane\n",
        expected: &[("tabbed", "a\tb"), ("literal key", "v"), ("windows", "c:\\lane")],
    },
    Case {
        name: "unicode escapes",
        text: "city=Z\\u00fcrich\n",
        expected: &[("city", "Zürich")],
    },
    Case {
        name: "key only and empty values",
        text: "flag\nempty=\nspaced   \n",
        expected: &[("flag", ""), ("empty", ""), ("spaced", "")],
    },
    Case {
        name: "duplicate keys keep the last value",
        text: "k=first\nk=second\n",
        expected: &[("k", "second")],
    },
];

#[test]
fn test_compat_corpus() {
    for case in CASES {
        let entries = parse(case.text).unwrap_or_else(|err| {
            panic!("case \"{}\" failed to parse: {err}", case.name);
        });
        let expected: Vec<(String, String)> = case
            .expected
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(entries, expected, "case \"{}\"", case.name);
    }
}

#[test]
fn test_latin1_documents_parse() {
    let text = decode_latin1(b"accent=n\xe9e\n");
    assert_eq!(
        parse(&text).unwrap(),
        vec![("accent".to_string(), "n\u{e9}e".to_string())]
    );
}
