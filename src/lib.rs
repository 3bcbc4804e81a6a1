pub mod board;
pub mod game;

pub fn trim_lane(cells: &mut [u64]) -> bool {
    let mut write = 0; // Write ptr
    let mut moved = false;

    for read in 0..cells.len() {
        if cells[read] == 0 {
            continue;
        }

        if write != read {
            cells[write] = cells[read];
            cells[read] = 0;
            moved = true;
        }

        write += 1;
    }

    moved
}

pub fn pack_lane(cells: &mut [u64]) -> bool {
    let mut changed = trim_lane(cells);

    // A merged neighbor becomes zero and fails the non-zero test on the next
    // comparison, so no cell merges twice in one sweep.
    for i in 0..cells.len().saturating_sub(1) {
        if cells[i] != 0 && cells[i] == cells[i + 1] {
            cells[i] *= 2;
            cells[i + 1] = 0;
            changed = true;
        }
    }

    trim_lane(cells) || changed
}
