use bitvec::order::Msb0;
use bitvec::slice::BitSlice;
use ff::Field;

use crate::field::FieldElement;

/// An affine point on the Stark curve `y^2 = x^3 + x + b`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CurvePoint {
    pub x: FieldElement,
    pub y: FieldElement,
    pub infinity: bool,
}

impl CurvePoint {
    fn identity() -> CurvePoint {
        Self {
            x: FieldElement::ZERO,
            y: FieldElement::ZERO,
            infinity: true,
        }
    }

    fn double(&self) -> CurvePoint {
        if self.infinity {
            return self.clone();
        }

        // lambda = (3x^2 + a) / 2y, with a = 1 on the Stark curve
        let lambda = {
            let two = FieldElement::ONE + FieldElement::ONE;
            let three = two + FieldElement::ONE;
            let dividend = three * (self.x * self.x) + FieldElement::ONE;
            let divisor_inv = (two * self.y).invert().unwrap();
            dividend * divisor_inv
        };

        let result_x = (lambda * lambda) - self.x - self.x;
        let result_y = lambda * (self.x - result_x) - self.y;

        CurvePoint {
            x: result_x,
            y: result_y,
            infinity: false,
        }
    }

    pub fn add(&self, other: &CurvePoint) -> CurvePoint {
        if self.infinity {
            return other.clone();
        }
        if other.infinity {
            return self.clone();
        }

        // lambda = (y2 - y1) / (x2 - x1)
        let lambda = {
            let dividend = other.y - self.y;
            let divisor_inv = (other.x - self.x).invert().unwrap();
            dividend * divisor_inv
        };

        let result_x = (lambda * lambda) - self.x - other.x;
        let result_y = lambda * (self.x - result_x) - self.y;

        CurvePoint {
            x: result_x,
            y: result_y,
            infinity: false,
        }
    }

    /// Multiplies the point by the big-endian bit slice using double-and-add.
    pub fn multiply(&self, bits: &BitSlice<u8, Msb0>) -> CurvePoint {
        let mut product = CurvePoint::identity();
        for b in bits {
            product = product.double();
            if *b {
                product = product.add(self);
            }
        }
        product
    }
}

/// Montgomery representation of the Pedersen shift point P0.
pub const PEDERSEN_P0: CurvePoint = CurvePoint {
    x: FieldElement::from_montgomery_limbs([
        1933903796324928314,
        7739989395386261137,
        1641324389046377921,
        316327189671755572,
    ]),
    y: FieldElement::from_montgomery_limbs([
        14252083571674603243,
        12587053260418384210,
        4798858472748676776,
        81375596133053150,
    ]),
    infinity: false,
};

/// Montgomery representation of the Pedersen generator P1.
pub const PEDERSEN_P1: CurvePoint = CurvePoint {
    x: FieldElement::from_montgomery_limbs([
        3602345268353203007,
        13758484295849329960,
        518715844721862878,
        241691544791834578,
    ]),
    y: FieldElement::from_montgomery_limbs([
        13441546676070136227,
        13001553326386915570,
        433857700841878496,
        368891789801938570,
    ]),
    infinity: false,
};

/// Montgomery representation of the Pedersen generator P2.
pub const PEDERSEN_P2: CurvePoint = CurvePoint {
    x: FieldElement::from_montgomery_limbs([
        16491878934996302286,
        12382025591154462459,
        10043949394709899044,
        253000153565733272,
    ]),
    y: FieldElement::from_montgomery_limbs([
        13950428914333633429,
        2545498000137298346,
        5191292837124484988,
        285630633187035523,
    ]),
    infinity: false,
};

/// Montgomery representation of the Pedersen generator P3.
pub const PEDERSEN_P3: CurvePoint = CurvePoint {
    x: FieldElement::from_montgomery_limbs([
        1203723169299412240,
        18195981508842736832,
        12916675983929588442,
        338510149841406402,
    ]),
    y: FieldElement::from_montgomery_limbs([
        12352616181161700245,
        11743524503750604092,
        11088962269971685343,
        161068411212710156,
    ]),
    infinity: false,
};

/// Montgomery representation of the Pedersen generator P4.
pub const PEDERSEN_P4: CurvePoint = CurvePoint {
    x: FieldElement::from_montgomery_limbs([
        1145636535101238356,
        10664803185694787051,
        299781701614706065,
        425493972656615276,
    ]),
    y: FieldElement::from_montgomery_limbs([
        8187986478389849302,
        4428713245976508844,
        6033691581221864148,
        345457391846365716,
    ]),
    infinity: false,
};

#[cfg(test)]
mod tests {
    use super::*;
    use bitvec::view::BitView;
    use ff::PrimeField;
    use pretty_assertions::assert_eq;

    fn curve_from_xy_str(x: &str, y: &str) -> CurvePoint {
        let x = FieldElement::from_str_vartime(x).expect("Curve x-value invalid");
        let y = FieldElement::from_str_vartime(y).expect("Curve y-value invalid");
        CurvePoint {
            x,
            y,
            infinity: false,
        }
    }

    fn curve_generator() -> CurvePoint {
        curve_from_xy_str(
            "874739451078007766457464989774322083649278607533249481151382481072868806602",
            "152666792071518830868575557812948353041420400780739481342941381225525861407",
        )
    }

    #[test]
    fn double() {
        let g_double = curve_generator().double();
        let expected = curve_from_xy_str(
            "3324833730090626974525872402899302150520188025637965566623476530814354734325",
            "3147007486456030910661996439995670279305852583596209647900952752170983517249",
        );
        assert_eq!(g_double, expected);
    }

    #[test]
    fn double_and_add() {
        let g = curve_generator();
        let g_triple = g.double().add(&g);
        let expected = curve_from_xy_str(
            "1839793652349538280924927302501143912227271479439798783640887258675143576352",
            "3564972295958783757568195431080951091358810058262272733141798511604612925062",
        );
        assert_eq!(g_triple, expected);
    }

    #[test]
    fn multiply() {
        let three = 3u64.to_be_bytes();
        let g = curve_generator();
        let g_triple = g.multiply(three.view_bits());
        let expected = curve_from_xy_str(
            "1839793652349538280924927302501143912227271479439798783640887258675143576352",
            "3564972295958783757568195431080951091358810058262272733141798511604612925062",
        );
        assert_eq!(g_triple, expected);
    }

    #[test]
    fn multiply_by_zero_is_identity() {
        let zero = 0u64.to_be_bytes();
        assert!(curve_generator().multiply(zero.view_bits()).infinity);
    }

    #[test]
    fn pedersen_points_match_published_values() {
        // Affine coordinates from the Starkware reference constants.
        let expected = [
            (
                "2089986280348253421170679821480865132823066470938446095505822317253594081284",
                "1713931329540660377023406109199410414810705867260802078187082345529207694986",
            ),
            (
                "996781205833008774514500082376783249102396023663454813447423147977397232763",
                "1668503676786377725805489344771023921079126552019160156920634619255970485781",
            ),
            (
                "2251563274489750535117886426533222435294046428347329203627021249169616184184",
                "1798716007562728905295480679789526322175868328062420237419143593021674992973",
            ),
            (
                "2138414695194151160943305727036575959195309218611738193261179310511854807447",
                "113410276730064486255102093846540133784865286929052426931474106396135072156",
            ),
            (
                "2379962749567351885752724891227938183011949129833673362440656643086021394946",
                "776496453633298175483985398648758586525933812536653089401905292063708816422",
            ),
        ];
        let points = [
            &PEDERSEN_P0,
            &PEDERSEN_P1,
            &PEDERSEN_P2,
            &PEDERSEN_P3,
            &PEDERSEN_P4,
        ];
        for ((x, y), point) in expected.into_iter().zip(points) {
            assert_eq!(&curve_from_xy_str(x, y), point);
        }
    }
}
