use serenity::all::{Guild, Permissions, RoleId, UserId};

/// Resolve a member's effective guild permissions from the cached guild.
///
/// The guild owner holds all permissions. Otherwise the member's role
/// permissions are unioned together with the `@everyone` role. Returns `None`
/// when the user is not a cached member of the guild.
pub fn resolve_member_permissions(guild: &Guild, user_id: UserId) -> Option<Permissions> {
    if guild.owner_id == user_id {
        return Some(Permissions::all());
    }

    let member = guild.members.get(&user_id)?;

    // The @everyone role shares the guild's own id.
    let everyone_role_id = RoleId::new(guild.id.get());

    let mut resolved = Permissions::empty();
    for role in guild.roles.values() {
        if role.id == everyone_role_id || member.roles.contains(&role.id) {
            resolved |= role.permissions;
        }
    }

    Some(resolved)
}

/// Convert a permission bitset into a sorted display list.
///
/// If `ADMINISTRATOR` is present, only `ADMINISTRATOR` is returned because
/// it implicitly grants all permissions.
pub fn permission_names(perms: Permissions) -> Vec<String> {
    if perms.contains(Permissions::ADMINISTRATOR) {
        return vec!["ADMINISTRATOR".to_owned()];
    }

    let mut names: Vec<String> = perms
        .iter_names()
        .map(|(name, _flag)| name.to_owned())
        .collect();
    names.sort_unstable();
    names
}
