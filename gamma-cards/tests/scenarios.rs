use gamma_cards::{CardError, CardRecord, Gamma, Parameters};
use pretty_assertions::assert_eq;

fn card_ids(records: &[CardRecord]) -> Vec<&str> {
    records.iter().filter_map(CardRecord::card_id).collect()
}

fn card<'a>(records: &'a [CardRecord], id: &str) -> &'a CardRecord {
    records
        .iter()
        .find(|record| record.card_id() == Some(id))
        .unwrap_or_else(|| panic!("no '{}' card in {:?}", id, records))
}

#[test]
fn derivative() {
    let gamma = Gamma::default();
    let records = gamma.classify_and_evaluate("diff(cos(x)^7, x)");

    match &records[0] {
        CardRecord::Output { title, input, output } => {
            assert_eq!(title, "Input");
            assert_eq!(input, "diff(cos(x)**7, x)");
            assert!(output.as_deref().unwrap().contains("\\frac{d}{d x}"), "{:?}", output);
        },
        other => panic!("expected the input record, got {:?}", other),
    }
    assert_eq!(card_ids(&records), vec!["diff", "diffsteps", "integral_alternate"]);

    match card(&records, "diffsteps") {
        CardRecord::Card { var, input, .. } => {
            assert_eq!(var, "x");
            assert_eq!(input.as_deref(), Some("diff(cos(x)**7, x)"));
        },
        other => panic!("expected a card record, got {:?}", other),
    }

    let steps = gamma
        .evaluate_card("diffsteps", "diff(cos(x)^7, x)", "x", &Parameters::new())
        .unwrap();
    assert!(steps.output.starts_with("<div class=\"steps\">"), "{}", steps.output);
    assert!(steps.output.len() > "<div class=\"steps\"></div>".len());

    let derivative = gamma
        .evaluate_card("diff", "diff(cos(x)^7, x)", "x", &Parameters::new())
        .unwrap();
    assert!(derivative.value.contains("sin(x)"), "{}", derivative.value);
    assert!(derivative.value.contains("cos(x)**6"), "{}", derivative.value);
}

#[test]
fn constant_derivative() {
    let gamma = Gamma::default();
    assert_eq!(card_ids(&gamma.classify_and_evaluate("diff(2*x, x)")), vec!["diff", "diffsteps"]);
    assert_eq!(card_ids(&gamma.classify_and_evaluate("diff(x**2, x, 2)")), vec!["diff", "diffsteps"]);
}

#[test]
fn integral() {
    let gamma = Gamma::default();
    let records = gamma.classify_and_evaluate("integrate(1/z, z)");
    assert_eq!(card_ids(&records), vec!["integral_alternate_fake", "intsteps", "diff", "integral_alternate"]);

    let info = gamma.get_card_info("integral", "integrate(1/z, z)", "z").unwrap();
    assert_eq!(info.var, "z");
    assert_eq!(info.input.as_deref(), Some("integrate(1/z, z)"));
    assert_eq!(info.pre_output, "\\int \\frac{1}{z}\\, dz");

    let output = gamma
        .evaluate_card("integral", "integrate(1/z, z)", "z", &Parameters::new())
        .unwrap();
    assert_eq!(output.value, "log(z)");
    assert_eq!(output.output, "<script type=\"math/tex; mode=display\">\\log{\\left(z \\right)}</script>");
}

#[test]
fn invalid_input() {
    let records = Gamma::default().classify_and_evaluate("^^^");
    assert_eq!(records, vec![
        CardRecord::Output { title: "Input".to_string(), input: "^^^".to_string(), output: None },
        CardRecord::Error {
            title: "Error".to_string(),
            input: "^^^".to_string(),
            error: "Invalid input".to_string(),
        },
    ]);
}

#[test]
fn empty_input() {
    assert_eq!(Gamma::default().classify_and_evaluate(""), vec![]);
}

#[test]
fn syntax_error() {
    let records = Gamma::default().classify_and_evaluate("x = 2");
    assert_eq!(records.len(), 2);
    match &records[1] {
        CardRecord::SyntaxError { input, exception_info, .. } => {
            assert_eq!(input, "x = 2");
            assert!(exception_info.offset >= 1);
            assert!(!exception_info.msg.is_empty());
        },
        other => panic!("expected a syntax error record, got {:?}", other),
    }
}

#[test]
fn unknown_card() {
    let err = Gamma::default()
        .evaluate_card("no_such_card", "x", "x", &Parameters::new())
        .unwrap_err();
    assert_eq!(err, CardError::NotFound("no_such_card".to_string()));
}

#[test]
fn antiderivative_forms_are_not_repeated() {
    let output = Gamma::default()
        .evaluate_card("integral_alternate", "x", "x", &Parameters::new())
        .unwrap();
    assert_eq!(output.value.matches("<ResultCard").count(), 1, "{}", output.value);
    assert_eq!(output.output.matches("<li ").count(), 1, "{}", output.output);
    assert!(output.output.contains("\\mathrm{with\\;constant = C}"));
}

#[test]
fn constants() {
    let gamma = Gamma::default();
    let records = gamma.classify_and_evaluate("sqrt(2)");
    assert_eq!(card_ids(&records), vec!["root_to_polynomial", "approximator"]);
    match card(&records, "approximator") {
        CardRecord::Card { input, parameters, .. } => {
            assert_eq!(input.as_deref(), Some("sqrt(2).evalf(15)"));
            assert_eq!(parameters, &vec!["digits".to_string()]);
        },
        other => panic!("expected a card record, got {:?}", other),
    }

    let parameters = Parameters::from([("digits".to_string(), "5".to_string())]);
    let output = gamma.evaluate_card("approximator", "sqrt(2)", "x", &parameters).unwrap();
    assert_eq!(output.value, "1.4142");
}

#[test]
fn long_integers() {
    let records = Gamma::default().classify_and_evaluate("2**400");
    assert_eq!(card_ids(&records), vec!["digits"]);
    match card(&records, "digits") {
        CardRecord::Card { input: Some(input), .. } => {
            assert!(input.contains("..."), "{}", input);
            assert_eq!(input.len(), 20 + 3 + 21);
        },
        other => panic!("expected a card record with input, got {:?}", other),
    }
}

#[test]
fn classification_is_deterministic() {
    let gamma = Gamma::default();
    let first = gamma.classify_and_evaluate("sin(x)**2 + x");
    let second = gamma.classify_and_evaluate("sin(x)**2 + x");
    assert_eq!(first, second);
    assert_eq!(card_ids(&first), vec!["trig_alternate", "diff", "integral_alternate"]);
}
