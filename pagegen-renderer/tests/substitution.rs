use pagegen_core::{AttributeMap, AttributeName, SubstitutionMode, Template};
use pagegen_renderer::TemplateEngine;
use rstest::rstest;

fn attrs(pairs: &[(&str, &str)]) -> AttributeMap {
    pairs
        .iter()
        .map(|(k, v)| (AttributeName::from(*k), (*v).to_string()))
        .collect()
}

#[rstest]
#[case::two_attributes("<p>{a}</p>{b}", &[("a", "X"), ("b", "Y")], "<p>X</p>Y")]
#[case::unmatched_placeholder("{missing}", &[], "{missing}")]
#[case::unmatched_next_to_matched("{title}{subtitle}", &[("title", "T")], "T{subtitle}")]
#[case::repeated_placeholder("{x}{x} and {x}", &[("x", "1")], "11 and 1")]
#[case::empty_value("[{a}]", &[("a", "")], "[]")]
#[case::double_open_brace("{{a}}", &[("a", "X")], "{X}")]
#[case::unclosed_brace("{a", &[("a", "X")], "{a")]
#[case::lone_close_brace("a}", &[("a", "X")], "a}")]
#[case::multibyte_text("é{a}ü{b}", &[("a", "ß"), ("b", "✓")], "éßü✓")]
#[case::multiline_value("<div>{body}</div>", &[("body", "l1\nl2\n")], "<div>l1\nl2\n</div>")]
#[case::no_placeholders("<html></html>", &[("a", "X")], "<html></html>")]
#[case::html_left_unescaped("{a}", &[("a", "<b>&amp;</b>")], "<b>&amp;</b>")]
#[case::name_with_close_brace("[{a}b}]", &[("a}b", "X")], "[X]")]
#[case::empty_name("<{}>", &[("", "E")], "<E>")]
fn renders_expected(
    #[case] template: &str,
    #[case] pairs: &[(&str, &str)],
    #[case] expected: &str,
    #[values(SubstitutionMode::Simultaneous, SubstitutionMode::Sequential)] mode: SubstitutionMode,
) {
    let engine = TemplateEngine::with_mode(Template::from(template), mode);
    assert_eq!(engine.render(&attrs(pairs)), expected);
}

#[test]
fn end_to_end_pages_from_shared_engine() {
    let engine = TemplateEngine::new(Template::from("<h1>{title}</h1>"));
    assert_eq!(engine.render(&attrs(&[("title", "Hello")])), "<h1>Hello</h1>");
    assert_eq!(engine.render(&attrs(&[("title", "World")])), "<h1>World</h1>");
}

#[test]
fn engine_is_shareable_across_threads() {
    let engine = std::sync::Arc::new(TemplateEngine::new(Template::from("{n}")));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let engine = engine.clone();
            std::thread::spawn(move || engine.render(&attrs(&[("n", i.to_string().as_str())])))
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), i.to_string());
    }
}
