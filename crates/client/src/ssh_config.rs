//! Rendering of resolved entries into ssh_config Host blocks.
//!
//! Responsibilities:
//! - Format one Host block per entry (User/ProxyJump/Port lines omitted when
//!   unset).
//! - Write the whole file through a temp file and an atomic rename, so a
//!   failed render never corrupts a previously valid config.

use std::io::{self, Write};
use std::path::Path;

use crate::models::SshEntry;

impl SshEntry {
    /// The entry formatted as an ssh_config Host block, terminated by a
    /// blank line.
    pub fn config_block(&self) -> String {
        let mut lines = vec![format!("Host {}", self.names.join(" "))];

        if let Some(user) = &self.user {
            lines.push(format!("    User {user}"));
        }
        if let Some(proxy_jump) = &self.proxy_jump {
            lines.push(format!("    ProxyJump {proxy_jump}"));
        }
        if let Some(port) = self.port {
            lines.push(format!("    Port {port}"));
        }
        lines.push(format!("    Hostname {}", self.address));
        lines.push("\n".to_string());

        lines.join("\n")
    }
}

/// Render all entries and atomically replace `path` with the result.
pub fn write_ssh_config(entries: &[SshEntry], path: &Path) -> io::Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = match dir {
        Some(dir) => tempfile::NamedTempFile::new_in(dir)?,
        None => tempfile::NamedTempFile::new()?,
    };

    for entry in entries {
        tmp.write_all(entry.config_block().as_bytes())?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_config::Account;

    fn entry() -> SshEntry {
        SshEntry {
            account: Account::named("prod"),
            instance_id: "i-123456789".to_string(),
            address: "54.54.54.54".to_string(),
            proxy_jump: None,
            port: None,
            user: Some("ec2-user".to_string()),
            names: vec!["i-123456789".to_string(), "some_custom_name".to_string()],
        }
    }

    #[test]
    fn basic_block_omits_unset_lines() {
        let expected = "Host i-123456789 some_custom_name\n    User ec2-user\n    Hostname 54.54.54.54\n\n";
        assert_eq!(entry().config_block(), expected);
    }

    #[test]
    fn full_block_includes_jump_and_port() {
        let mut entry = entry();
        entry.user = Some("ubuntu".to_string());
        entry.port = Some(2222);
        entry.proxy_jump = Some("jumphost".to_string());

        let expected = "Host i-123456789 some_custom_name\n    User ubuntu\n    ProxyJump jumphost\n    Port 2222\n    Hostname 54.54.54.54\n\n";
        assert_eq!(entry.config_block(), expected);
    }

    #[test]
    fn write_replaces_the_destination_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ssh_config");
        std::fs::write(&path, "previous contents").unwrap();

        write_ssh_config(&[entry()], &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Host i-123456789"));
        assert!(!written.contains("previous contents"));
        // No temp files left behind.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn a_failed_rename_leaves_the_destination_untouched() {
        let dir = tempfile::tempdir().unwrap();

        // A directory at the destination path makes the final rename fail,
        // after the temp file has already been written. Whatever lived at
        // the destination must survive byte for byte.
        let dest = dir.path().join("ssh_config");
        std::fs::create_dir(&dest).unwrap();
        std::fs::write(dest.join("keep"), "previous contents").unwrap();

        assert!(write_ssh_config(&[entry()], &dest).is_err());
        assert_eq!(
            std::fs::read_to_string(dest.join("keep")).unwrap(),
            "previous contents"
        );
        // The failed temp file is cleaned up, not left next to the target.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn an_unwritable_parent_surfaces_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "previous contents").unwrap();

        // The destination's parent is a regular file; the render fails
        // before anything is created and the file keeps its contents.
        let dest = blocker.join("ssh_config");
        assert!(write_ssh_config(&[entry()], &dest).is_err());
        assert_eq!(
            std::fs::read_to_string(&blocker).unwrap(),
            "previous contents"
        );
    }
}
