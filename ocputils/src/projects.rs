use crate::ocp::Project;

/// One line per project, with the display name and requester when the project carries them
pub fn to_text(projects: &[Project]) -> String {
  projects
    .iter()
    .map(|project| {
      let mut line = format!("Project: {}", project.name);
      if let Some(display_name) = &project.display_name {
        line.push_str(&format!(" \"{display_name}\""));
      }
      if let Some(requester) = &project.requester {
        line.push_str(&format!(" (requester: {requester})"));
      }
      line.push('\n');
      line
    })
    .collect()
}
