#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::datetime;
    use crate::models::{Voter, VoteRecord};

    fn vote(poll_id: u64, vote_id: u64) -> VoteRecord {
        VoteRecord {
            poll_id,
            vote_id,
            vote_date: datetime!(2023-10-01 12:30:00 UTC),
        }
    }

    #[test]
    fn test_document_shape() {
        let mut voter = Voter::new(1, "A", "a@x");
        voter.record_vote(vote(7, 2));

        let value = serde_json::to_value(&voter).unwrap();
        assert_eq!(value, json!({
            "VoterId": 1,
            "Name": "A",
            "Email": "a@x",
            "VoteHistory": [
                { "PollId": 7, "VoteId": 2, "VoteDate": "2023-10-01T12:30:00Z" }
            ]
        }));

        let back: Voter = serde_json::from_value(value).unwrap();
        assert_eq!(back, voter);
    }

    #[test]
    fn test_empty_history_encodes_as_array() {
        let value = serde_json::to_value(Voter::new(3, "C", "c@x")).unwrap();
        assert_eq!(value["VoteHistory"], json!([]));
    }

    #[test]
    fn test_missing_or_null_history() {
        let null_history: Voter = serde_json::from_value(json!({
            "VoterId": 2, "Name": "B", "Email": "b@x", "VoteHistory": null
        })).unwrap();
        assert!(null_history.vote_history.is_empty());

        let missing: Voter = serde_json::from_value(json!({
            "VoterId": 2, "Name": "B", "Email": "b@x"
        })).unwrap();
        assert_eq!(missing, null_history);
    }

    #[test]
    fn test_vote_date_precision_and_offset() {
        let record: VoteRecord = serde_json::from_value(json!({
            "PollId": 1, "VoteId": 1, "VoteDate": "2023-10-01T08:30:00.123456789-04:00"
        })).unwrap();
        assert_eq!(record.vote_date, datetime!(2023-10-01 08:30:00.123456789 -4));

        let again: VoteRecord = serde_json::from_value(serde_json::to_value(&record).unwrap()).unwrap();
        assert_eq!(again, record);
    }

    #[test]
    fn test_malformed_document() {
        assert!(serde_json::from_value::<Voter>(json!({ "VoterId": "one" })).is_err());
        assert!(serde_json::from_value::<VoteRecord>(json!({
            "PollId": 1, "VoteId": 1, "VoteDate": "yesterday"
        })).is_err());
    }

    #[test]
    fn test_find_vote_first_occurrence() {
        let mut voter = Voter::new(1, "A", "a@x");
        voter.record_vote(vote(7, 2));
        voter.record_vote(vote(8, 1));
        voter.record_vote(vote(7, 5));

        assert_eq!(voter.find_vote(7).map(|v| v.vote_id), Some(2));
        assert_eq!(voter.find_vote(8).map(|v| v.vote_id), Some(1));
        assert!(voter.find_vote(9).is_none());
        assert_eq!(voter.total_votes(), 3);
    }
}
