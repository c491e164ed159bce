use crate::*;

#[test]
fn parse_styled_bold_word() {
    let styled = parse_styled("plain <b>bold</b> plain").unwrap();
    assert_eq!(styled.text, "plain bold plain");

    let starts: Vec<_> = styled.runs.iter().map(|r| r.start).collect();
    assert_eq!(starts, vec![0, 6, 10]);
    assert!(styled.runs[0].state.is_empty());
    assert_eq!(styled.runs[1].state.weight, Some(700));
    assert!(styled.runs[2].state.is_empty());
}

#[test]
fn parse_styled_nested_spans_accumulate_state() {
    let styled = parse_styled("<b>a<i>b</i></b>c").unwrap();
    assert_eq!(styled.text, "abc");
    assert_eq!(styled.runs.len(), 3);
    assert_eq!(
        styled.runs[1].state,
        StyleState {
            weight: Some(700),
            style: Some(Slant::Italic),
            ..StyleState::default()
        }
    );
    assert!(styled.runs[2].state.is_empty());
}

#[test]
fn parse_styled_inner_weight_overrides_outer() {
    let styled = parse_styled("<b>a<span weight=\"light\">b</span></b>").unwrap();
    assert_eq!(styled.runs[0].state.weight, Some(700));
    assert_eq!(styled.runs[1].state.weight, Some(300));
}

#[test]
fn parse_styled_plain_text_has_single_empty_run() {
    let styled = parse_styled("no markup here").unwrap();
    assert!(styled.records.is_empty());
    assert_eq!(styled.runs.len(), 1);
    assert!(styled.runs[0].state.is_empty());
}

#[test]
fn parse_styled_underline_only_is_unstyled() {
    let styled = parse_styled("<u>x</u>").unwrap();
    assert_eq!(styled.records.len(), 1);
    assert_eq!(styled.records[0].kind, AttrKind::Underline);
    assert!(styled.runs.iter().all(|r| r.state.is_empty()));
}

#[test]
fn style_runs_serialize_to_json() {
    let styled = parse_styled("x<sub>i</sub>").unwrap();
    let json = serde_json::to_value(&styled.runs).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            { "start": 0, "state": {} },
            { "start": 1, "state": { "rise": -5000, "scale": 1.0 / 1.2 } }
        ])
    );
}

#[test]
fn style_runs_accept_hand_built_records() {
    let raw = vec![
        RawRecord::int(AttrKind::Weight, 0, 2, 900),
        RawRecord::int(AttrKind::Style, 0, 2, 7),
    ];
    let styled = style_runs("ab".to_string(), &raw);
    assert_eq!(styled.runs.len(), 1);
    assert_eq!(styled.runs[0].state.weight, Some(900));
    assert_eq!(styled.runs[0].state.style, Some(Slant::Other(7)));
}
