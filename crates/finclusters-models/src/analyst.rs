//! Analyst-implied expected return.
//!
//! r = 1 / (forward P/E) + g

/// Expected return implied by the consensus forward P/E.
///
/// Returns `None` when the P/E is missing, non-finite or not positive: the
/// inversion is meaningless there and must not produce a negative or
/// infinite return.
pub fn analyst_implied_return(forward_pe: Option<f64>, assumed_growth: f64) -> Option<f64> {
    let pe = forward_pe.filter(|pe| pe.is_finite() && *pe > 0.0)?;
    Some(1.0 / pe + assumed_growth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_implied_return() {
        let r = analyst_implied_return(Some(25.0), 0.03).unwrap();
        assert_relative_eq!(r, 0.07, epsilon = 1e-12);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(0.0))]
    #[case(Some(-12.5))]
    #[case(Some(f64::NAN))]
    #[case(Some(f64::INFINITY))]
    fn test_unavailable(#[case] forward_pe: Option<f64>) {
        assert_eq!(analyst_implied_return(forward_pe, 0.03), None);
    }
}
