use hikidoc_engine::sink::ListKind;
use hikidoc_engine::{Compiler, Event, EventLog, Options, to_xhtml};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn xhtml(src: &str) -> String {
    to_xhtml(src, &Options::default()).unwrap()
}

/// An unclosed opener becomes a one-line paragraph and the lines after it
/// compile exactly as they would on their own.
#[rstest]
#[case("* item\n!head")]
#[case("||a||b\n;t;:d")]
#[case("<<<d\nx\n>>>\n----")]
#[case("<<<p\nraw\n>>>\n{{plugin}}")]
fn unclosed_block_leaves_the_rest_untouched(#[case] rest: &str) {
    let src = format!("<<<b\n{rest}");
    let expected = format!("<p>&lt;&lt;&lt;b</p>\n{}", xhtml(rest));
    assert_eq!(xhtml(&src), expected);
}

#[test]
fn unclosed_block_followed_by_text_joins_one_paragraph() {
    assert_eq!(xhtml("<<<b\nfoo\n"), "<p>&lt;&lt;&lt;b\nfoo</p>\n");
}

#[test]
fn nested_list_closes_every_level() {
    let events = Compiler::new(EventLog::new(), Options::default())
        .compile("* foo\n** bar")
        .unwrap();
    let opened = events
        .iter()
        .filter(|event| matches!(event, Event::ListOpen { .. }))
        .count();
    let closed = events
        .iter()
        .filter(|event| matches!(event, Event::ListClose(_)))
        .count();
    assert_eq!(opened, 2);
    assert_eq!(closed, 2);
    assert_eq!(
        &events[events.len() - 3..],
        &[
            Event::ListItemClose,
            Event::ListClose(ListKind::Unordered),
            Event::LineBreak,
        ]
    );
}

#[test]
fn quoted_closer_stays_inside_the_plugin() {
    let mut compiler = Compiler::new(EventLog::new(), Options::default());
    let first = compiler.compile("{{foo(\"}}\")}}").unwrap();
    assert_eq!(first, vec![Event::BlockPlugin("foo(\"}}\")".to_string())]);
    assert_eq!(compiler.compile("{{foo(\"}}\")}}").unwrap(), first);
}
