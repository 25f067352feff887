use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection { Up, Down }
impl std::fmt::Display for VoteDirection {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt,"{:?}", self)
    }
}

//poll option embedded in a post
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PollOption {
    pub text: String,
    #[serde(default)]
    pub votes: i64,
    #[serde(default)]
    pub voted_by: Vec<String>,
}

impl PollOption {
    pub fn new(text: &str) -> Self {
        Self { text: text.to_string(), votes: 0, voted_by: Vec::new() }
    }
}

//posts
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub uuid: String,
    pub author_id: String,
    pub author: String,
    pub text: String,

    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub upvoted_by: Vec<String>,
    #[serde(default)]
    pub downvoted_by: Vec<String>,
    #[serde(default)]
    pub comments_count: i64,

    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub is_poll: bool,
    #[serde(default)]
    pub poll_options: Vec<PollOption>,
    #[serde(default)]
    pub poll_end_date: Option<i64>,
    #[serde(default)]
    pub poll_notified: bool,

    #[serde(default)]
    pub is_repost: bool,
    #[serde(default)]
    pub original_post_id: Option<String>,
    #[serde(default)]
    pub original_author_id: Option<String>,
    #[serde(default)]
    pub original_author: Option<String>,
    #[serde(default)]
    pub reposts_count: i64,
    #[serde(default)]
    pub reposted_by: Vec<String>,

    pub created_at: i64,
}

impl Post {
    pub fn new(uuid: &str, author_id: &str, author: &str, text: &str, created_at: i64) -> Self {
        Self {
            uuid: uuid.to_string(),
            author_id: author_id.to_string(),
            author: author.to_string(),
            text: text.to_string(),
            score: 0,
            upvoted_by: Vec::new(),
            downvoted_by: Vec::new(),
            comments_count: 0,
            is_anonymous: false,
            is_poll: false,
            poll_options: Vec::new(),
            poll_end_date: None,
            poll_notified: false,
            is_repost: false,
            original_post_id: None,
            original_author_id: None,
            original_author: None,
            reposts_count: 0,
            reposted_by: Vec::new(),
            created_at,
        }
    }

    /// Distinct voters across every option, in first-seen order. A voter who
    /// picked several options of a multi-select poll appears once.
    pub fn distinct_voters(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.poll_options
            .iter()
            .flat_map(|option| option.voted_by.iter())
            .filter(|voter| seen.insert(voter.as_str()))
            .cloned()
            .collect()
    }

    pub fn is_reposted_by(&self, user_id: &str) -> bool {
        self.reposted_by.iter().any(|id| id == user_id)
    }

    pub fn poll_is_open(&self, now: i64) -> bool {
        match self.poll_end_date {
            Some(end) => self.is_poll && now < end,
            None => self.is_poll,
        }
    }
}

/// Score transition observed by a vote, handed to the badge evaluator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoreChange {
    pub before: i64,
    pub after: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoteOutcome {
    pub author_id: String,
    pub change: ScoreChange,
    pub newly_upvoted: bool,
}

/// Applies an up/down toggle to `post`. Voting the same direction twice
/// withdraws the vote; voting the other way switches it.
pub fn apply_vote(post: &mut Post, user_id: &str, direction: VoteDirection) -> VoteOutcome {
    let before = post.score;
    let was_up = post.upvoted_by.iter().any(|id| id == user_id);
    let was_down = post.downvoted_by.iter().any(|id| id == user_id);

    post.upvoted_by.retain(|id| id != user_id);
    post.downvoted_by.retain(|id| id != user_id);

    let mut newly_upvoted = false;
    match direction {
        VoteDirection::Up if !was_up => {
            post.upvoted_by.push(user_id.to_string());
            newly_upvoted = true;
        },
        VoteDirection::Down if !was_down => {
            post.downvoted_by.push(user_id.to_string());
        },
        _ => {},
    }

    let withdrawn = if was_up { -1 } else if was_down { 1 } else { 0 };
    let cast = match (direction, newly_upvoted) {
        (VoteDirection::Up, true) => 1,
        (VoteDirection::Down, _) if !was_down => -1,
        _ => 0,
    };
    post.score = before + withdrawn + cast;

    VoteOutcome {
        author_id: post.author_id.clone(),
        change: ScoreChange { before, after: post.score },
        newly_upvoted,
    }
}

/// Toggles `user_id` on the option at `index`. Returns whether the user now
/// has a vote on that option, or `None` when the index is out of range.
pub fn toggle_poll_vote(post: &mut Post, user_id: &str, index: usize) -> Option<bool> {
    let option = post.poll_options.get_mut(index)?;
    if option.voted_by.iter().any(|id| id == user_id) {
        option.voted_by.retain(|id| id != user_id);
        option.votes = (option.votes - 1).max(0);
        Some(false)
    }
    else {
        option.voted_by.push(user_id.to_string());
        option.votes += 1;
        Some(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(score: i64) -> Post {
        let mut post = Post::new("p1", "author", "author", "hello", 0);
        post.score = score;
        post
    }

    #[test]
    fn upvote_twice_withdraws() {
        let mut p = post(99);
        let first = apply_vote(&mut p, "u1", VoteDirection::Up);
        assert_eq!(first.change, ScoreChange { before: 99, after: 100 });
        assert!(first.newly_upvoted);

        let second = apply_vote(&mut p, "u1", VoteDirection::Up);
        assert_eq!(second.change, ScoreChange { before: 100, after: 99 });
        assert!(!second.newly_upvoted);
        assert!(p.upvoted_by.is_empty());
    }

    #[test]
    fn switching_direction_moves_score_by_two() {
        let mut p = post(10);
        apply_vote(&mut p, "u1", VoteDirection::Down);
        assert_eq!(p.score, 9);

        let outcome = apply_vote(&mut p, "u1", VoteDirection::Up);
        assert_eq!(outcome.change, ScoreChange { before: 9, after: 11 });
        assert_eq!(p.upvoted_by, vec!["u1".to_string()]);
        assert!(p.downvoted_by.is_empty());
    }

    #[test]
    fn distinct_voters_is_a_union() {
        let mut p = post(0);
        p.is_poll = true;
        p.poll_options = vec![
            PollOption { text: "a".into(), votes: 2, voted_by: vec!["A".into(), "B".into()] },
            PollOption { text: "b".into(), votes: 2, voted_by: vec!["B".into(), "C".into()] },
        ];
        assert_eq!(p.distinct_voters(), vec!["A", "B", "C"]);
    }

    #[test]
    fn poll_vote_toggles() {
        let mut p = post(0);
        p.is_poll = true;
        p.poll_options = vec![PollOption::new("a"), PollOption::new("b")];

        assert_eq!(toggle_poll_vote(&mut p, "u1", 1), Some(true));
        assert_eq!(p.poll_options[1].votes, 1);
        assert_eq!(toggle_poll_vote(&mut p, "u1", 1), Some(false));
        assert_eq!(p.poll_options[1].votes, 0);
        assert_eq!(toggle_poll_vote(&mut p, "u1", 5), None);
    }
}
