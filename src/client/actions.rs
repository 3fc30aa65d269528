/// Endpoint names that modify state on Twitter. A call whose path ends with one of these (optionally
/// followed by a numeric id) is sent as a POST unless a method is given explicitly.
pub const POST_ACTIONS: &[&str] = &[
    // Status Methods
    "update",
    "retweet",
    "update_with_media",
    "statuses/lookup",
    // Direct Message Methods
    "new",
    "direct_messages/events/new",
    "direct_messages/welcome_messages/new",
    "direct_messages/welcome_messages/rules/new",
    "direct_messages/indicate_typing",
    "direct_messages/mark_read",
    // Account Methods
    "update_profile_image",
    "update_delivery_device",
    "update_profile",
    "update_profile_background_image",
    "update_profile_colors",
    "update_location",
    "end_session",
    "settings",
    "update_profile_banner",
    "remove_profile_banner",
    // Notification Methods
    "leave",
    "follow",
    // Status Methods, Block Methods, Direct Message Methods,
    // Friendship Methods, Favorite Methods
    "destroy",
    "destroy_all",
    // Block Methods, Friendship Methods, Favorite Methods
    "create",
    "create_all",
    // Users Methods
    "users/lookup",
    "report_spam",
    // Streaming Methods
    "filter",
    "user",
    "site",
    // OAuth Methods
    "token",
    "access_token",
    "request_token",
    "invalidate_token",
    // Upload Methods
    "media/upload",
    "media/metadata/create",
    "media/subtitles/create",
    "media/subtitles/delete",
    // Lists Methods
    "lists/members/create",
    "lists/members/create_all",
    "lists/members/destroy",
    "lists/members/destroy_all",
    "lists/subscribers/create",
    "lists/subscribers/destroy",
    "lists/update",
    // Collections Methods
    "collections/entries/add",
    "collections/entries/curate",
    "collections/entries/move",
    "collections/entries/remove",
    "collections/update",
    // Saved Searches Methods
    "saved_searches/create",
    // Mutes Methods
    "mutes/users/create",
    "mutes/users/destroy",
];

/// Checks whether `uri` names a write action and should default to POST.
pub fn is_post_action(uri: &str) -> bool {
    let uri = strip_numeric_suffix(uri);
    POST_ACTIONS.iter().any(|action| uri.ends_with(action))
}

// Drops a trailing `/<digits>` segment, if there is one
fn strip_numeric_suffix(uri: &str) -> &str {
    match uri.rfind('/') {
        Some(idx) => {
            let tail = &uri[idx + 1..];
            if !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()) {
                &uri[..idx]
            } else {
                uri
            }
        }
        None => uri,
    }
}

#[cfg(test)]
mod test {
    use super::is_post_action;

    #[test]
    fn write_actions() {
        assert!(is_post_action("1.1/statuses/update"));
        assert!(is_post_action("1.1/statuses/retweet/1234567"));
        assert!(is_post_action("1.1/statuses/destroy/1234567"));
        assert!(is_post_action("1.1/friendships/create"));
        assert!(is_post_action("1.1/media/upload"));
        assert!(is_post_action("1.1/lists/members/create_all"));
    }

    #[test]
    fn read_actions() {
        assert!(!is_post_action("1.1/statuses/home_timeline"));
        assert!(!is_post_action("1.1/statuses/show/1234567"));
        assert!(!is_post_action("1.1/search/tweets"));
        assert!(!is_post_action("1.1/statuses/retweet/12a"));
        assert!(!is_post_action(""));
    }
}
