/// Gives a single-field integer newtype the arithmetic a ledger needs: `+`, `-`, `+=`, `-=`, unary `-` and `Sum`.
///
/// The traits must be in scope at the call site.
#[macro_export]
macro_rules! op {
    ($newtype:ident) => {
        $crate::op!(@binary $newtype, Add::add, Sub::sub);
        $crate::op!(@assign $newtype, AddAssign::add_assign, SubAssign::sub_assign);

        impl Neg for $newtype {
            type Output = Self;

            fn neg(self) -> Self {
                Self(-self.0)
            }
        }

        impl Sum for $newtype {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::default(), |acc, v| acc + v)
            }
        }
    };

    (@binary $newtype:ident, $($tr:ident::$f:ident),+) => {
        $(impl $tr for $newtype {
            type Output = Self;

            fn $f(self, rhs: Self) -> Self {
                Self(self.0.$f(rhs.0))
            }
        })+
    };

    (@assign $newtype:ident, $($tr:ident::$f:ident),+) => {
        $(impl $tr for $newtype {
            fn $f(&mut self, rhs: Self) {
                self.0.$f(rhs.0)
            }
        })+
    };
}
