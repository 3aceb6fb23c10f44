//! Exact-cost deck enumeration. A 0/1 subset-sum table indexed by total cost, where each
//! cell holds card-index combinations in discovery order.

/// Combinations of `costs` indices for every total cost in `0..=max_budget`.
///
/// Each cell keeps at most `cap` combinations. Cells only ever grow by appending, so the
/// capped cell is exactly the first `cap` entries of the uncapped one. Indices within a
/// combination are ascending.
pub fn combinations_by_cost(costs: &[u32], max_budget: u32, cap: usize) -> Vec<Vec<Vec<usize>>> {
    let size = max_budget as usize + 1;
    let mut table: Vec<Vec<Vec<usize>>> = vec![Vec::new(); size];
    if cap == 0 {
        return table;
    }
    table[0].push(Vec::new());

    for (index, &cost) in costs.iter().enumerate() {
        let cost = cost as usize;
        if cost >= size {
            continue;
        }
        for total in (cost..size).rev() {
            let room = cap.saturating_sub(table[total].len());
            if room == 0 {
                continue;
            }
            // Collected before extending: a zero-cost card reads and writes the same cell.
            let extended: Vec<Vec<usize>> = table[total - cost]
                .iter()
                .take(room)
                .map(|combo| {
                    let mut combo = combo.clone();
                    combo.push(index);
                    combo
                })
                .collect();
            table[total].extend(extended);
        }
    }
    table
}

/// Combinations whose costs sum to exactly `budget`.
pub fn combinations_for_budget(costs: &[u32], budget: u32, cap: usize) -> Vec<Vec<usize>> {
    combinations_by_cost(costs, budget, cap)
        .pop()
        .unwrap_or_default()
}
