//! Constants against their known binary expansions.

use astro_ball::Ball;
use astro_ball::CachePolicy;
use astro_ball::Constant;
use astro_ball::Consts;
use astro_ball::Float;
use astro_ball::RoundingMode;

// Ball [t, t + 2^e] for the truncated expansion t given in hex.
fn truncated(hex: &str, e: i64) -> Ball {
    let lo: Float = format!("0x{}p{}", hex, e).parse().unwrap();
    let ulp: Float = format!("0x1p{}", e).parse().unwrap();
    let hi = lo.add(&ulp, 256, RoundingMode::ToZero).unwrap().0;
    Ball::set_interval(&lo, &hi, 256)
}

#[test]
fn known_expansions() {
    let pi = truncated("3243F6A8885A308D313198A2E0370734", -124);
    let e = truncated("2B7E151628AED2A6ABF7158809CF4F3C", -124);
    let ln2 = truncated("B17217F7D1CF79ABC9E3B39803F2F6AF", -128);
    let euler = truncated("93C467E37DB0C7A4", -64);

    for policy in [CachePolicy::Exact, CachePolicy::Doubling, CachePolicy::Headroom(10)] {
        let mut cc = Consts::with_policy(policy);
        for p in [140, 300, 1000] {
            assert!(pi.contains(&cc.pi(p)), "pi at {}", p);
            assert!(e.contains(&cc.e(p)), "e at {}", p);
            assert!(ln2.contains(&cc.ln2(p)), "ln 2 at {}", p);
            assert!(euler.contains(&cc.euler(p)), "euler at {}", p);

            assert!(cc.pi(p).rel_accuracy_bits() >= p as i64 - 4);
            assert!(cc.euler(p).rel_accuracy_bits() >= p as i64 - 4);
        }
    }
}

#[test]
fn cache_refresh() {
    let mut cc = Consts::with_policy(CachePolicy::Exact);
    let low = cc.ln2(100);
    let high = cc.ln2(2000);
    assert_eq!(cc.cached_precision(Constant::Ln2), 2000);
    assert!(low.overlaps(&high));

    // served from the cache without a refresh
    let again = cc.ln2(500);
    assert_eq!(cc.cached_precision(Constant::Ln2), 2000);
    assert!(again.overlaps(&high));
    assert!(again.rel_accuracy_bits() >= 496);

    // constants agree with the functions
    let mut cc = Consts::new();
    let one = Ball::one();
    let e = one.exp(256, &mut cc);
    assert!(e.overlaps(&cc.e(256)));
    let pi4 = one.atan(256, &mut cc).mul_2exp(2);
    assert!(pi4.overlaps(&cc.pi(256)));
    let l = Ball::from_i64(2).ln(256, &mut cc);
    assert!(l.overlaps(&cc.ln2(256)));
}
