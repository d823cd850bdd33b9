//! Fork/join summation.
//!
//! A range of term indices is split into a fixed number of contiguous parts. Each part is
//! summed by its own task with its own `Context`, so no constants cache is shared between
//! threads, and the partial sums are joined by ball addition.

use crate::ball::Ball;
use crate::ctx::Context;
use crate::defs::Error;
use core::ops::Range;
use itertools::Itertools;
use rayon::prelude::*;
use rayon::ThreadPool;
use rayon::ThreadPoolBuilder;

/// Runs a number of independent tasks and collects their results in task order.
pub trait Executor {
    /// Runs `f(0)`, ..., `f(tasks - 1)` and returns the results in that order.
    fn fork_join<T, F>(&self, tasks: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync;
}

/// Runs the tasks one after another in the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl Executor for Sequential {
    fn fork_join<T, F>(&self, tasks: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync,
    {
        (0..tasks).map(f).collect()
    }
}

/// Runs the tasks on a rayon thread pool.
#[derive(Debug, Default)]
pub struct Parallel {
    pool: Option<ThreadPool>,
}

impl Parallel {
    /// Executor using the global rayon pool.
    pub fn new() -> Self {
        Parallel { pool: None }
    }

    /// Executor using a dedicated pool of `n` threads.
    ///
    /// ## Errors
    ///
    ///  - ThreadPool: the pool could not be created.
    pub fn with_threads(n: usize) -> Result<Self, Error> {
        let pool = ThreadPoolBuilder::new().num_threads(n).build()?;
        Ok(Parallel { pool: Some(pool) })
    }
}

impl Executor for Parallel {
    fn fork_join<T, F>(&self, tasks: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync,
    {
        let run = || (0..tasks).into_par_iter().map(&f).collect();
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }
}

/// Splits `range` into `tasks` contiguous parts whose lengths differ by at most one.
/// Leading parts are the longer ones.
pub fn partition(range: Range<u64>, tasks: usize) -> Vec<Range<u64>> {
    if tasks == 0 {
        return Vec::new();
    }
    let len = range.end.saturating_sub(range.start);
    let n = tasks as u64;
    let (q, r) = (len / n, len % n);

    let mut start = range.start;
    (0..n)
        .map(|i| {
            let end = start + q + (i < r) as u64;
            let part = start..end;
            start = end;
            part
        })
        .collect()
}

/// Computes the sum of `term(k)` for `k` in `range` with `tasks` tasks run by `exec`.
///
/// Every task works with a clone of `ctx`, i.e. with the same cache policy and a cache
/// of its own. The working precision of task `i` covering part `r` is `prec_of(i, r)`.
/// The result is rounded to the precision of `ctx`.
///
/// ## Errors
///
///  - InvalidArgument: `tasks` is zero.
pub fn sum_series<E, P, T>(
    exec: &E,
    ctx: &Context,
    range: Range<u64>,
    tasks: usize,
    prec_of: P,
    term: T,
) -> Result<Ball, Error>
where
    E: Executor,
    P: Fn(usize, &Range<u64>) -> usize + Send + Sync,
    T: Fn(u64, &mut Context) -> Ball + Send + Sync,
{
    if tasks == 0 {
        return Err(Error::InvalidArgument);
    }

    tracing::debug!(tasks, start = range.start, end = range.end, "fork/join sum");

    let parts = partition(range, tasks);
    let partials = exec.fork_join(tasks, |i| {
        let part = &parts[i];
        let mut tctx = ctx.clone();
        tctx.set_precision(prec_of(i, part));
        let wp = tctx.precision();

        let mut acc = Ball::zero();
        for k in part.clone() {
            let t = term(k, &mut tctx);
            acc = acc.add(&t, wp);
        }
        acc
    });

    let p = ctx.precision();
    let sum = partials.into_iter().tree_fold1(|a, b| a.add(&b, p + 8)).unwrap_or_default();

    Ok(sum.set_round(p))
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::ops::consts::Consts;

    #[test]
    fn test_partition() {
        assert_eq!(partition(0..10, 3), vec![0..4, 4..7, 7..10]);
        assert_eq!(partition(5..7, 4), vec![5..6, 6..7, 7..7, 7..7]);
        assert_eq!(partition(3..3, 2), vec![3..3, 3..3]);
        assert!(partition(0..10, 0).is_empty());

        let parts = partition(100..1000, 7);
        assert_eq!(parts.len(), 7);
        assert_eq!(parts.iter().map(|r| r.end - r.start).sum::<u64>(), 900);
    }

    #[test]
    fn test_executors() {
        let f = |i: usize| i * i;
        assert_eq!(Sequential.fork_join(5, f), vec![0, 1, 4, 9, 16]);
        assert_eq!(Parallel::new().fork_join(5, f), vec![0, 1, 4, 9, 16]);
        assert_eq!(Parallel::with_threads(2).unwrap().fork_join(5, f), vec![0, 1, 4, 9, 16]);
        assert!(Sequential.fork_join(0, f).is_empty());
    }

    #[test]
    fn test_sum_series() {
        let ctx = Context::new(128, Consts::new());

        // sum of 1/k^2
        let term = |k: u64, c: &mut Context| Ball::from_u64(k * k).inv(c.precision());
        let prec = |_: usize, _: &Range<u64>| 140;

        let s1 = sum_series(&Sequential, &ctx, 1..2001, 4, prec, term).unwrap();
        let s2 = sum_series(&Parallel::new(), &ctx, 1..2001, 4, prec, term).unwrap();
        let s3 = sum_series(&Parallel::with_threads(3).unwrap(), &ctx, 1..2001, 7, prec, term).unwrap();
        assert!(s1.overlaps(&s2));
        assert!(s1.overlaps(&s3));
        assert!(s1.rel_accuracy_bits() > 110);

        // pi^2/6 - 1/2000 < s < pi^2/6 - 1/2001
        let v = s1.mid().to_f64();
        let z = core::f64::consts::PI * core::f64::consts::PI / 6.0;
        assert!(v > z - 1.0 / 2000.0 && v < z - 1.0 / 2001.0);

        // terms using the per task constants cache
        let s = sum_series(&Parallel::new(), &ctx, 0..4, 2, |_, _| 128, |_, c: &mut Context| c.const_pi()).unwrap();
        assert!(s.overlaps(&Context::default().const_pi().mul_2exp(2)));

        assert!(matches!(sum_series(&Sequential, &ctx, 0..4, 0, prec, term), Err(Error::InvalidArgument)));

        let s = sum_series(&Sequential, &ctx, 5..5, 3, prec, term).unwrap();
        assert_eq!(s, Ball::zero());
    }
}
