use std::convert::Infallible;

use panoc::{panoc, BoxSet, Lbfgs, LbfgsParams, PanocParams, Problem};
use proptest::prelude::*;

/// One side of a bound: finite or infinite.
fn bound() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        1 => Just(None),
        3 => (-100.0f64..100.0).prop_map(Some),
    ]
}

/// A box of dimension 1..6 with ordered, possibly infinite bounds.
fn box_set() -> impl Strategy<Value = BoxSet<f64>> {
    prop::collection::vec((bound(), bound()), 1..6).prop_map(|sides| {
        let mut lower = Vec::with_capacity(sides.len());
        let mut upper = Vec::with_capacity(sides.len());
        for (a, b) in sides {
            let (lo, hi) = match (a, b) {
                (Some(a), Some(b)) => (a.min(b), a.max(b)),
                (Some(a), None) => (a, f64::INFINITY),
                (None, Some(b)) => (f64::NEG_INFINITY, b),
                (None, None) => (f64::NEG_INFINITY, f64::INFINITY),
            };
            lower.push(lo);
            upper.push(hi);
        }
        BoxSet::new(lower, upper)
    })
}

fn set_and_point() -> impl Strategy<Value = (BoxSet<f64>, Vec<f64>)> {
    box_set().prop_flat_map(|set| {
        let n = set.dim();
        (Just(set), prop::collection::vec(-1e3f64..1e3, n))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn projection_lands_in_the_box((set, v) in set_and_point()) {
        let p = set.project(&v);
        prop_assert!(set.contains(&p));
        for i in 0..v.len() {
            if set.lower()[i] == f64::NEG_INFINITY && v[i] <= set.upper()[i] {
                prop_assert_eq!(p[i], v[i]);
            }
            if set.upper()[i] == f64::INFINITY && v[i] >= set.lower()[i] {
                prop_assert_eq!(p[i], v[i]);
            }
        }
    }

    #[test]
    fn projection_is_idempotent((set, v) in set_and_point()) {
        let p = set.project(&v);
        prop_assert_eq!(set.project(&p), p.clone());
        if set.contains(&v) {
            prop_assert_eq!(p, v);
        }
    }

    #[test]
    fn rejected_pair_leaves_direction_unchanged(
        pairs in prop::collection::vec(
            (prop::collection::vec(-5.0f64..5.0, 3), prop::collection::vec(0.5f64..4.0, 3)),
            0..6,
        ),
        s_bad in prop::collection::vec(-5.0f64..5.0, 3),
        shrink in 0.1f64..10.0,
        v in prop::collection::vec(-10.0f64..10.0, 3),
    ) {
        let mut lbfgs = Lbfgs::new(3, &LbfgsParams::<f64>::default());
        // y = D s with D positive diagonal: always positive curvature
        for (s, diag) in &pairs {
            let y: Vec<f64> = s.iter().zip(diag).map(|(a, b)| a * b).collect();
            lbfgs.update(s, &y);
        }
        let before_len = lbfgs.len();
        let mut before = vec![0.0; 3];
        lbfgs.apply(1.0, &v, &mut before);

        // sᵀy = -shrink ‖s‖² ≤ 0
        let y_bad: Vec<f64> = s_bad.iter().map(|a| -shrink * a).collect();
        prop_assert!(!lbfgs.update(&s_bad, &y_bad));

        let mut after = vec![0.0; 3];
        lbfgs.apply(1.0, &v, &mut after);
        prop_assert_eq!(lbfgs.len(), before_len);
        prop_assert_eq!(before, after);
    }
}

/// `f(x) = a (x - t)²` on `[lo, ∞)`.
struct Parabola {
    a: f64,
    t: f64,
    c: BoxSet<f64>,
    d: BoxSet<f64>,
}

impl Problem<f64> for Parabola {
    type Error = Infallible;

    fn c(&self) -> &BoxSet<f64> {
        &self.c
    }

    fn d(&self) -> &BoxSet<f64> {
        &self.d
    }

    fn f(&self, x: &[f64]) -> Result<f64, Infallible> {
        Ok(self.a * (x[0] - self.t).powi(2))
    }

    fn grad_f(&self, x: &[f64], grad: &mut [f64]) -> Result<(), Infallible> {
        grad[0] = 2.0 * self.a * (x[0] - self.t);
        Ok(())
    }

    fn g(&self, _x: &[f64], _gx: &mut [f64]) -> Result<(), Infallible> {
        Ok(())
    }

    fn grad_g(&self, _x: &[f64], _y: &[f64], grad: &mut [f64]) -> Result<(), Infallible> {
        grad[0] = 0.0;
        Ok(())
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn parabola_converges_to_projected_minimizer(
        a in 0.5f64..50.0,
        t in -10.0f64..10.0,
        lo in -10.0f64..10.0,
        x0 in -50.0f64..50.0,
    ) {
        let p = Parabola {
            a,
            t,
            c: BoxSet::new(vec![lo], vec![f64::INFINITY]),
            d: BoxSet::unbounded(0),
        };
        let mut x = vec![x0];
        let result = panoc(&p, &mut x, &mut [], &mut [], &mut [], &[], 1e-8, &PanocParams::default());
        prop_assert!(result.is_ok(), "{:?}", result);
        let expected = t.max(lo);
        prop_assert!((x[0] - expected).abs() < 1e-6, "x = {}, expected {}", x[0], expected);
    }
}
