//! Context of computation: the working precision and the constants cache.

use crate::ball::Ball;
use crate::defs::DEFAULT_P;
use crate::defs::MIN_P;
use crate::ops::consts::Consts;

/// Context contains the default precision of operations and the constants cache they use.
///
/// A context is owned by a single thread of computation. Cloning a context copies the
/// precision and the cache policy, but the clone gets a fresh cache of its own.
#[derive(Debug)]
pub struct Context {
    cc: Consts,
    p: usize,
}

impl Context {
    /// Create a new context with precision `p` and constants cache `cc`.
    pub fn new(p: usize, cc: Consts) -> Self {
        Context { cc, p: p.max(MIN_P) }
    }

    /// Decomposes the context into the constants cache and the precision.
    pub fn to_raw_parts(self) -> (Consts, usize) {
        (self.cc, self.p)
    }

    /// Sets the precision of the context.
    pub fn set_precision(&mut self, p: usize) -> &mut Self {
        self.p = p.max(MIN_P);
        self
    }

    /// Replaces the constants cache of the context.
    pub fn set_consts(&mut self, cc: Consts) -> &mut Self {
        self.cc = cc;
        self
    }

    /// Returns the precision of the context.
    pub fn precision(&self) -> usize {
        self.p
    }

    /// Returns the constants cache of the context.
    pub fn consts(&mut self) -> &mut Consts {
        &mut self.cc
    }

    /// Returns π with the precision of the context.
    pub fn const_pi(&mut self) -> Ball {
        self.cc.pi(self.p)
    }

    /// Returns Euler's number with the precision of the context.
    pub fn const_e(&mut self) -> Ball {
        self.cc.e(self.p)
    }

    /// Returns the natural logarithm of 2 with the precision of the context.
    pub fn const_ln2(&mut self) -> Ball {
        self.cc.ln2(self.p)
    }

    /// Returns the Euler–Mascheroni constant with the precision of the context.
    pub fn const_euler(&mut self) -> Ball {
        self.cc.euler(self.p)
    }
}

macro_rules! impl_fun {
    ($comment:literal, $fname:ident) => {
        #[doc=$comment]
        pub fn $fname(&self, a: &Ball, b: &Ball) -> Ball {
            a.$fname(b, self.p)
        }
    };
}

macro_rules! impl_fun_cc {
    ($comment:literal, $fname:ident) => {
        #[doc=$comment]
        pub fn $fname(&mut self, x: &Ball) -> Ball {
            x.$fname(self.p, &mut self.cc)
        }
    };
}

impl Context {
    impl_fun!("Returns the sum of two balls.", add);
    impl_fun!("Returns the difference of two balls.", sub);
    impl_fun!("Returns the product of two balls.", mul);
    impl_fun!("Returns the quotient of two balls.", div);

    impl_fun_cc!("Returns the exponent of a ball.", exp);
    impl_fun_cc!("Returns the natural logarithm of a ball.", ln);
    impl_fun_cc!("Returns the sine of a ball.", sin);
    impl_fun_cc!("Returns the cosine of a ball.", cos);
    impl_fun_cc!("Returns the tangent of a ball.", tan);
    impl_fun_cc!("Returns the arctangent of a ball.", atan);

    /// Returns the square root of a ball.
    pub fn sqrt(&self, x: &Ball) -> Ball {
        x.sqrt(self.p)
    }

    /// Returns `x` to the power of `y`.
    pub fn pow(&mut self, x: &Ball, y: &Ball) -> Ball {
        x.pow(y, self.p, &mut self.cc)
    }
}

impl Clone for Context {
    fn clone(&self) -> Self {
        Context {
            cc: Consts::with_policy(self.cc.policy()),
            p: self.p,
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new(DEFAULT_P, Consts::new())
    }
}
