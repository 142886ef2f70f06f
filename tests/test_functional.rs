mod common;

use std::error::Error;

use boltzmann_collision::reaction::ReactionError;
use boltzmann_collision::utils::is_close::IsClose;
use boltzmann_collision::{DistributionFunctional, Functional, Kinematics, Statistics};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use common::{grid, random, scattering, decay};

#[test]
fn test_linearization_matches_naive_functional() -> Result<(), Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(7);
    let grid = grid(10.0, 41);

    for trial in 0..20 {
        let statistics = |i: usize| {
            if (trial >> i) & 1 == 0 {
                Statistics::FermiDirac
            } else {
                Statistics::BoseEinstein
            }
        };
        let reaction = scattering([
            random("a", 0.0, statistics(0), &grid, &mut rng),
            random("b", 0.5, statistics(1), &grid, &mut rng),
            random("c", 0.0, statistics(2), &grid, &mut rng),
            random("d", 0.5, statistics(3), &grid, &mut rng),
        ]);

        for _ in 0..25 {
            let momenta = [
                rng.random_range(0.0..10.0),
                rng.random_range(0.0..10.0),
                rng.random_range(0.0..10.0),
            ];
            let p = Kinematics::reconstruct(&momenta, reaction.particles()).p;
            let f0 = reaction.primary().species.distribution(p[0]);

            let naive = reaction.f_a(&p, None) + reaction.f_b(&p, None);
            let linearized = reaction.f_1(&p) + f0 * reaction.f_f(&p);
            naive.is_close(&linearized, 1e-14, 1e-12)?;
        }
    }
    Ok(())
}

#[test]
fn test_linearization_three_particle() -> Result<(), Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(11);
    let grid = grid(20.0, 81);
    let reaction = decay([
        random("X", 5.0, Statistics::BoseEinstein, &grid, &mut rng),
        random("e", 0.0, Statistics::FermiDirac, &grid, &mut rng),
        random("ν", 0.0, Statistics::FermiDirac, &grid, &mut rng),
    ]);

    for _ in 0..100 {
        let momenta = [rng.random_range(0.0..20.0), rng.random_range(0.0..20.0)];
        let p = Kinematics::reconstruct(&momenta, reaction.particles()).p;
        let f0 = reaction.primary().species.distribution(p[0]);
        let naive = Functional::NAIVE.evaluate(&reaction, &p);
        let linearized = Functional::CONSTANT.evaluate(&reaction, &p)
            + f0 * Functional::LINEAR.evaluate(&reaction, &p);
        naive.is_close(&linearized, 1e-14, 1e-12)?;
    }
    Ok(())
}

#[test]
fn test_forward_and_backward_signs() {
    let mut rng = StdRng::seed_from_u64(3);
    let grid = grid(10.0, 11);
    let reaction = scattering([
        random("a", 0.0, Statistics::FermiDirac, &grid, &mut rng),
        random("b", 0.0, Statistics::FermiDirac, &grid, &mut rng),
        random("c", 0.0, Statistics::FermiDirac, &grid, &mut rng),
        random("d", 0.0, Statistics::FermiDirac, &grid, &mut rng),
    ]);

    let p = [1.0, 2.0, 2.5, 0.5];
    assert!(reaction.f_a(&p, None) <= 0.0);
    assert!(reaction.f_b(&p, None) >= 0.0);
    assert_eq!(Functional::FORWARD.evaluate(&reaction, &p), reaction.f_a(&p, None));
    assert_eq!(Functional::BACKWARD.evaluate(&reaction, &p), reaction.f_b(&p, None));
}

#[test]
fn test_skip_index_drops_one_factor() {
    let grid = grid(10.0, 11);
    let reaction = scattering([
        common::flat("a", 0.0, Statistics::FermiDirac, &grid, 0.5),
        common::flat("b", 0.0, Statistics::FermiDirac, &grid, 0.25),
        common::flat("c", 0.0, Statistics::BoseEinstein, &grid, 0.5),
        common::flat("d", 0.0, Statistics::FermiDirac, &grid, 0.2),
    ]);
    let p = [1.0, 1.0, 1.0, 1.0];

    // -f_a f_b (1 + f_c) (1 - f_d)
    assert!((reaction.f_a(&p, None) - (-0.5 * 0.25 * 1.5 * 0.8)).abs() < 1e-15);
    assert!((reaction.f_a(&p, Some(0)) - (-0.25 * 1.5 * 0.8)).abs() < 1e-15);
    // f_c f_d (1 - f_a) (1 - f_b)
    assert!((reaction.f_b(&p, None) - 0.5 * 0.2 * 0.5 * 0.75).abs() < 1e-15);
    assert!((reaction.f_1(&p) - 0.5 * 0.2 * 0.75).abs() < 1e-15);
}

#[test]
fn test_conflicting_functional_is_rejected() {
    assert!(matches!(
        Functional::from_terms(false, false, true, true),
        Err(ReactionError::ConflictingFunctional)
    ));
    assert_eq!(
        Functional::from_terms(true, true, false, false),
        Ok(Functional::NAIVE)
    );
    assert_eq!(Functional::default(), Functional::NAIVE);
}

#[test]
fn test_combined_functional_adds_terms() -> Result<(), Box<dyn Error>> {
    let grid = grid(10.0, 11);
    let reaction = scattering([
        common::flat("a", 0.0, Statistics::FermiDirac, &grid, 0.3),
        common::flat("b", 0.0, Statistics::FermiDirac, &grid, 0.6),
        common::flat("c", 0.0, Statistics::FermiDirac, &grid, 0.1),
        common::flat("d", 0.0, Statistics::FermiDirac, &grid, 0.9),
    ]);
    let p = [2.0, 3.0, 4.0, 1.0];
    let functional = Functional::from_terms(true, false, false, true)?;
    functional
        .evaluate(&reaction, &p)
        .is_close(&(reaction.f_a(&p, None) + reaction.f_f(&p)), 1e-15, 1e-12)?;
    Ok(())
}
