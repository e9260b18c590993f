use ariadne::{Color, Label, Report, ReportKind, Source};
use gamma_cards::CardError;
use gamma_parser::parser::error::SyntaxErrorInfo;

/// Reports a syntax error to stderr, pointing at the offending character of the canonical input.
///
/// The report is built from the parts of the input the error carries, since the canonical text
/// is not the text the user typed.
pub fn report_syntax_error(info: &SyntaxErrorInfo) {
    let source = format!("{}{}", info.input_start, info.input_end);
    let len = source.chars().count();
    let start = info.offset.saturating_sub(1).min(len);
    let end = (start + 1).min(len);

    let report = Report::build(ReportKind::Error, "input", start)
        .with_message(&info.msg)
        .with_label(
            Label::new(("input", start..end))
                .with_message("here")
                .with_color(Color::Red),
        )
        .finish();
    if report.eprint(("input", Source::from(source))).is_err() {
        eprintln!("error: {}", info.msg);
    }
}

/// Reports the error of a single card to stderr.
pub fn report(err: &CardError) {
    match err {
        CardError::Syntax(info) => report_syntax_error(info),
        CardError::Internal { .. } => eprintln!("{}", err.card_text()),
        other => eprintln!("error: {}", other),
    }
}
