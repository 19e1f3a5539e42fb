use invaders::leaderboard::*;

#[test]
fn keeps_top_three_highest_first() {
    let mut board = Leaderboard::new(3);
    board.submit("ada", 120, 2);
    board.submit("bob", 300, 3);
    board.submit("cyd", 80, 1);
    board.submit("dee", 200, 2);

    let scores: Vec<u32> = board.entries().iter().map(|e| e.score).collect();
    assert_eq!(scores, vec![300, 200, 120]);
    assert_eq!(board.best().map(|e| e.name.as_str()), Some("bob"));
}

#[test]
fn submit_returns_rank_or_none() {
    let mut board = Leaderboard::new(2);
    assert_eq!(board.submit("a", 50, 1), Some(0));
    assert_eq!(board.submit("b", 70, 1), Some(0));
    assert_eq!(board.submit("c", 60, 1), Some(1));
    assert_eq!(board.submit("d", 10, 1), None);
    assert_eq!(board.entries().len(), 2);
}

#[test]
fn ties_keep_the_earlier_entry_ahead() {
    let mut board = Leaderboard::new(3);
    board.submit("first", 100, 1);
    assert_eq!(board.submit("second", 100, 1), Some(1));
    assert_eq!(board.entries()[0].name, "first");
}

#[test]
fn qualifies_matches_submit() {
    let mut board = Leaderboard::new(1);
    assert!(board.qualifies(0));
    board.submit("a", 100, 2);
    assert!(!board.qualifies(100));
    assert!(board.qualifies(101));
}

#[test]
fn names_are_trimmed_truncated_and_defaulted() {
    let mut board = Leaderboard::new(3);
    board.submit("   ", 30, 1);
    board.submit("  averyveryverylongname ", 20, 1);
    assert_eq!(board.entries()[0].name, "anonymous");
    assert_eq!(board.entries()[1].name, "averyveryver");
}
