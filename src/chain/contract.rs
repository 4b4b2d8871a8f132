//! Bindings for the deployed voting contract.
//!
//! The contract is the single source of truth for candidates, vote counts,
//! the ended flag, the round counter and ownership. Double-vote prevention
//! and owner gating are enforced on-chain; the gateway only pre-checks them
//! to return friendlier errors before spending gas.

use alloy::sol;

sol! {
    #[sol(rpc)]
    #[derive(Debug)]
    contract Voting {
        struct Candidate {
            string name;
            uint256 voteCount;
        }

        event CandidateAdded(string name, uint256 candidateIndex);
        event VoteCast(address voter, uint256 candidateIndex);
        event VotingEnded(string winner);

        function addCandidate(string memory name) external;
        function vote(uint256 candidateIndex) external;

        function getCandidates() external view returns (Candidate[] memory);
        function getCandidateCount() external view returns (uint256);
        function getVotingStatus() external view returns (bool);
        function getWinner() external view returns (string memory);
        function getCurrentVotingRound() external view returns (uint256);
        function lastVotingRound(address voter) external view returns (uint256);
        function hasVoted(address voter) external view returns (bool);
        function owner() external view returns (address);

        function endVoting() external;
        function startVoting() external;
        function resetVoting() external;
    }
}
