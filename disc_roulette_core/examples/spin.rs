use disc_roulette_core::{SeededRandom, SpinSequencer, UniformPicker};

fn main() {
    // Example grouped session: three spins, a refused fourth, then a reset
    let rng = SeededRandom::new("example-server-seed", "example-client-seed", 1);
    println!("server_seed_hash={}", rng.server_seed_hash_hex());
    let mut picker = UniformPicker::new(rng);
    let mut sequencer = SpinSequencer::grouped21();

    for _ in 0..4 {
        match sequencer.spin(&mut picker) {
            Ok(record) => println!(
                "group={} left={} right={}",
                record.group_label.as_deref().unwrap_or("-"),
                record.left,
                record.right
            ),
            Err(err) => println!("refused: {err}"),
        }
    }
    sequencer.reset();
    println!("history after reset: {:?}", sequencer.history());
}
