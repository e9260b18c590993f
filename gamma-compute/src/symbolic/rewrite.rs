//! Rewriting trigonometric functions in terms of another function, as in `cos(x).rewrite(sin)`.

use super::expr::{Primary, SymExpr};

fn int(n: i64) -> SymExpr {
    SymExpr::integer(n)
}

/// `name(arg)`, kept as written. The evaluating constructor would fold some of these straight
/// back into the function being rewritten.
fn held(name: &str, arg: SymExpr) -> SymExpr {
    SymExpr::Primary(Primary::Call(name.to_string(), vec![arg]))
}

/// Rewrites one call to a trigonometric function in terms of `target`.
fn rewrite_call(name: &str, u: &SymExpr, target: &str) -> Option<SymExpr> {
    let quarter_turn = SymExpr::pi() / int(2);
    let shifted_up = u.clone() + quarter_turn.clone();
    let shifted_down = u.clone() - quarter_turn;
    let half = u.clone() / int(2);
    let double = int(2) * u.clone();
    let square = |expr: SymExpr| SymExpr::pow(expr, int(2));

    let rewritten = match (target, name) {
        ("sin", "cos") => held("sin", shifted_up),
        ("sin", "tan") => int(2) * square(held("sin", u.clone())) / held("sin", double),
        ("sin", "cot") => held("sin", double) / (int(2) * square(held("sin", u.clone()))),
        ("sin", "sec") => SymExpr::recip(held("sin", shifted_up)),
        ("sin", "csc") => SymExpr::recip(held("sin", u.clone())),

        ("cos", "sin") => held("cos", shifted_down),
        ("cos", "tan") => held("cos", shifted_down) / held("cos", u.clone()),
        ("cos", "cot") => held("cos", u.clone()) / held("cos", shifted_down),
        ("cos", "sec") => SymExpr::recip(held("cos", u.clone())),
        ("cos", "csc") => SymExpr::recip(held("cos", shifted_down)),

        ("tan", "sin") => {
            let t = held("tan", half);
            int(2) * t.clone() / (square(t) + int(1))
        },
        ("tan", "cos") => {
            let t2 = square(held("tan", half));
            (int(1) - t2.clone()) / (t2 + int(1))
        },
        ("tan", "cot") => SymExpr::recip(held("tan", u.clone())),
        ("tan", "sec") => {
            let t2 = square(held("tan", half));
            (t2.clone() + int(1)) / (int(1) - t2)
        },
        ("tan", "csc") => {
            let t = held("tan", half);
            (square(t.clone()) + int(1)) / (int(2) * t)
        },

        ("exp", "sin" | "cos" | "tan") => {
            let i = SymExpr::i();
            let up = SymExpr::call1("exp", i.clone() * u.clone());
            let down = SymExpr::call1("exp", -(i.clone() * u.clone()));
            match name {
                "sin" => -(i * (up - down)) / int(2),
                "cos" => (up + down) / int(2),
                _ => -(i * (up.clone() - down.clone())) / (up + down),
            }
        },
        _ => return None,
    };
    Some(rewritten)
}

/// Rewrites every trigonometric function in the expression in terms of `target`, which is one of
/// `sin`, `cos`, `tan`, or `exp`. Calls with no rewrite in terms of `target` are kept.
pub fn rewrite(expr: &SymExpr, target: &str) -> SymExpr {
    let rebuilt = expr.map_children(&mut |child| rewrite(child, target));
    if let Some((name, [u])) = rebuilt.as_call() {
        if let Some(rewritten) = rewrite_call(name, u, target).filter(|_| name != target) {
            return rewritten;
        }
    }
    rebuilt
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> SymExpr {
        SymExpr::symbol("x")
    }

    #[test]
    fn between_sine_and_cosine() {
        let cos = SymExpr::call1("cos", x());
        assert_eq!(rewrite(&cos, "sin").to_string(), "sin(x + pi/2)");
        let tan = SymExpr::call1("tan", x());
        assert_eq!(rewrite(&tan, "sin").to_string(), "2*sin(x)**2/sin(2*x)");
    }

    #[test]
    fn half_angle_tangent() {
        let sin = SymExpr::call1("sin", x());
        let rewritten = rewrite(&sin, "tan");
        assert!(rewritten.has_function("tan"));
        assert!(!rewritten.has_function("sin"));
        let at = |expr: &SymExpr| expr.subs_symbol("x", &SymExpr::rational(7, 10)).to_f64().unwrap();
        assert!((at(&rewritten) - at(&sin)).abs() < 1e-12);
    }

    #[test]
    fn untouched() {
        let log = SymExpr::call1("log", x());
        assert_eq!(rewrite(&log, "sin"), log);
        let sin = SymExpr::call1("sin", x());
        assert_eq!(rewrite(&sin, "sin"), sin);
    }
}
