//! English stop-word list used by the normalizer.
//!
//! Directional words ("up", "down", "above", "below") are deliberately absent:
//! they carry the signal in questions like "why is QQQ down?".

pub(crate) const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "again", "against", "all", "almost", "also", "although", "am", "among",
    "an", "and", "another", "any", "anyone", "anything", "are", "around", "as", "at", "be",
    "became", "because", "become", "been", "before", "being", "between", "both", "but", "by",
    "can", "could", "did", "do", "does", "doing", "done", "during", "each", "either", "else",
    "enough", "etc", "even", "ever", "every", "for", "from", "further", "had", "has", "have",
    "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how", "however",
    "i", "if", "in", "into", "is", "it", "its", "itself", "just", "least", "less", "made", "many",
    "may", "me", "might", "mine", "more", "most", "much", "must", "my", "myself", "neither",
    "nor", "now", "of", "often", "on", "once", "only", "or", "other", "others", "otherwise",
    "our", "ours", "ourselves", "per", "perhaps", "please", "quite", "rather", "re", "really",
    "same", "say", "says", "see", "seem", "seemed", "seems", "several", "she", "should", "since",
    "so", "some", "somehow", "someone", "something", "sometime", "sometimes", "still", "such",
    "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there", "thereby",
    "therefore", "these", "they", "this", "those", "though", "through", "thus", "to", "together",
    "too", "toward", "towards", "until", "upon", "us", "very", "via", "was", "we", "well", "were",
    "what", "whatever", "when", "whenever", "where", "whereas", "whether", "which", "while",
    "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "would", "yet",
    "you", "your", "yours", "yourself", "yourselves",
];

#[must_use]
pub(crate) fn is_stop_word(lower: &str) -> bool {
    STOP_WORDS.binary_search(&lower).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_is_sorted_for_binary_search() {
        assert!(STOP_WORDS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn recognizes_common_words() {
        assert!(is_stop_word("the"));
        assert!(is_stop_word("why"));
        assert!(!is_stop_word("down"));
        assert!(!is_stop_word("tesla"));
    }
}
