use crate::board::Rules;

// Make/unmake perft; a wrong count means make and unmake are not exact inverses
// or move generation is off.
pub fn perft<P: Rules>(pos: &mut P, depth: u32) -> u64 {
    if depth == 0 { return 1; }
    let moves = pos.legal_moves();
    if depth == 1 { return moves.len() as u64; }
    let mut nodes = 0u64;
    for m in moves {
        pos.make_move(m);
        nodes += perft(pos, depth - 1);
        pos.unmake_move(m);
    }
    nodes
}

/// Per-root-move counts, in enumeration order.
pub fn divide<P: Rules>(pos: &mut P, depth: u32) -> Vec<(P::Move, u64)> {
    if depth == 0 { return Vec::new(); }
    let mut out = Vec::new();
    for m in pos.legal_moves() {
        pos.make_move(m);
        out.push((m, perft(pos, depth - 1)));
        pos.unmake_move(m);
    }
    out
}
