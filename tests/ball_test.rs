//! Tests of the ball arithmetic and relations through the public interface.

use astro_ball::Ball;
use astro_ball::Consts;
use astro_ball::Float;
use astro_ball::Mag;
use astro_ball::Sign;
use rand::random;

fn special_balls() -> Vec<Ball> {
    let pinf = Float::Inf(Sign::Pos);
    let ninf = Float::Inf(Sign::Neg);
    vec![
        Ball::zero(),
        Ball::from_i64(1),
        Ball::from_i64(-1),
        Ball::exact(pinf.clone()),
        Ball::exact(ninf.clone()),
        Ball::new(pinf, Mag::one()),
        Ball::new(ninf, Mag::one()),
        Ball::new(Float::Zero, Mag::Inf),
        Ball::new(Float::from_i64(1), Mag::Inf),
        Ball::new(Float::from_i64(-1), Mag::Inf),
        Ball::exact(Float::NaN),
        Ball::new(Float::NaN, Mag::one()),
        Ball::new(Float::NaN, Mag::Inf),
    ]
}

// zero, 1, -1, +inf, -inf, +inf +/- 1, -inf +/- 1, 0 +/- inf, 1 +/- inf, -1 +/- inf, nan, nan +/- 1, nan +/- inf
const CONTAINS: [[u8; 13]; 13] = [
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

const OVERLAPS: [[u8; 13]; 13] = [
    [1, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1],
    [0, 1, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1],
    [0, 0, 1, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1],
    [0, 0, 0, 1, 0, 1, 0, 1, 1, 1, 1, 1, 1],
    [0, 0, 0, 0, 1, 0, 1, 1, 1, 1, 1, 1, 1],
    [0, 0, 0, 1, 0, 1, 0, 1, 1, 1, 1, 1, 1],
    [0, 0, 0, 0, 1, 0, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

#[test]
fn special_relations() {
    let balls = special_balls();
    for (i, x) in balls.iter().enumerate() {
        for (j, y) in balls.iter().enumerate() {
            assert_eq!(x.contains(y), CONTAINS[i][j] == 1, "contains({}, {})", x, y);
            assert_eq!(x.overlaps(y), OVERLAPS[i][j] == 1, "overlaps({}, {})", x, y);
        }
    }
}

#[test]
fn scenarios() {
    // 0.6 + (0 +/- 2^-60) at 53 bits
    let x = Ball::from_ratio(3, 5, 53);
    let e = Ball::new(Float::Zero, Mag::from_2exp(-60));
    let y = x.add(&e, 53);
    assert!(y.contains(&Ball::from_ratio(3, 5, 200)));
    assert!(*y.rad() >= Mag::from_2exp(-60));

    // division by 1 +/- 2 gives the whole line
    let d = Ball::from_f64_with_error(1.0, 2.0);
    for x in [Ball::one(), Ball::zero(), Ball::from_f64(-1e10), Ball::from_f64_with_error(5.0, 1.0)] {
        let q = x.div(&d, 64);
        assert_eq!(*q.mid(), Float::Zero);
        assert!(q.rad().is_inf());
    }

    assert!(Ball::indeterminate().contains(&Ball::from_i64(7)));
    assert!(Ball::zero().overlaps(&Ball::zero_pm_inf()));
    assert!(!Ball::zero().contains(&Ball::one()));
}

// Interval [m - r, m + r] with integer endpoints.
fn int_ball() -> (Ball, i128, i128) {
    let m = (random::<i64>() % 1000) as i128;
    let r = (random::<u64>() % 100) as i128;
    let b = Ball::new(Float::from_i64(m as i64), Mag::from_u64(r as u64));
    (b, m - r, m + r)
}

#[test]
fn relations_against_integer_intervals() {
    for _ in 0..10000 {
        let (x, xl, xh) = int_ball();
        let (y, yl, yh) = int_ball();

        assert_eq!(x.contains(&y), xl <= yl && yh <= xh);
        assert_eq!(x.overlaps(&y), xl <= yh && yl <= xh);
        assert_eq!(x.is_positive(), xl > 0);
        assert_eq!(x.is_nonnegative(), xl >= 0);
        assert_eq!(x.is_negative(), xh < 0);
        assert_eq!(x.is_nonpositive(), xh <= 0);
        assert_eq!(x.is_nonzero(), xl > 0 || xh < 0);
        assert_eq!(x.contains_zero(), xl <= 0 && 0 <= xh);
        assert_eq!(x.contains_positive(), xh > 0);
        assert_eq!(x.contains_negative(), xl < 0);
        assert_eq!(x.lt(&y), xh < yl);
        assert_eq!(x.le(&y), xh <= yl);
        assert_eq!(x.gt(&y), xl > yh);
        assert_eq!(x.ge(&y), xl >= yh);

        let i = random::<i64>() % 1100;
        assert_eq!(x.contains_i64(i), xl <= i as i128 && i as i128 <= xh);

        // the exact sum and product intervals are contained in the results
        let s = x.add(&y, 64);
        assert!(s.contains(&Ball::new(Float::from_i64((xl + yl) as i64), Mag::Zero)));
        assert!(s.contains(&Ball::new(Float::from_i64((xh + yh) as i64), Mag::Zero)));

        let p = x.mul(&y, 64);
        for a in [xl, xh] {
            for b in [yl, yh] {
                assert!(p.contains_i64((a * b) as i64));
            }
        }
    }
}

#[test]
fn transcendental_against_f64() {
    let mut cc = Consts::new();
    for _ in 0..1000 {
        let v = (random::<f64>() - 0.5) * 20.0;
        let x = Ball::from_f64(v);
        let p = 64;

        let close = |b: Ball, r: f64| (b.mid().to_f64() - r).abs() <= r.abs() * 1e-14 + 1e-300;

        assert!(close(x.exp(p, &mut cc), v.exp()));
        assert!(close(x.sin(p, &mut cc), v.sin()) || (v.sin().abs() < 1e-3));
        assert!(close(x.cos(p, &mut cc), v.cos()) || (v.cos().abs() < 1e-3));
        assert!(close(x.atan(p, &mut cc), v.atan()));
        assert!(close(x.abs().ln(p, &mut cc), v.abs().ln()) || (v.abs() - 1.0).abs() < 1e-3);
        assert!(close(x.abs().sqrt(p), v.abs().sqrt()));
    }
}

#[test]
fn roundtrip_text() {
    for _ in 0..100 {
        let x = Ball::random(200, -100, 100).unwrap();
        let s = x.to_string();
        assert_eq!(s.parse::<Ball>().unwrap(), x);
    }
    assert!("[0x1p0 +/- ".parse::<Ball>().is_err());
    assert_eq!("0x3p-1".parse::<Ball>().unwrap(), Ball::from_f64(1.5));
}
