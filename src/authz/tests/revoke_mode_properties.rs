//! Property tests for revoke evaluation
//!
//! `Always` and `Auto` must produce identical decisions on arbitrary record
//! sets, and a covering revoke must beat any covering grant.

use procflow_authz::{
    AuthorizationPath, AuthorizationRecord, AuthorizationRequest, AuthorizationStore,
    InMemoryAuthorizationStore, Permission, PermissionResolver, PermissionTriple, Principal,
    PrincipalSet, RecordKind, ResourceInstance, ResourceModel, ResourceType, RevokeMode,
};
use proptest::prelude::*;
use std::sync::Arc;

const INSTANCES: [&str; 3] = ["*", "t1", "t2"];
const USERS: [&str; 2] = ["u1", "u2"];
const GROUPS: [&str; 2] = ["g1", "g2"];

fn resource_type(index: usize) -> ResourceType {
    ResourceType::ALL[index % ResourceType::ALL.len()]
}

fn permission_for(resource_type: ResourceType, index: usize) -> Permission {
    let valid = ResourceModel::new().valid_permissions(resource_type);
    valid[index % valid.len()]
}

fn principal(index: usize) -> Principal {
    match index % 4 {
        0 | 1 => Principal::user(USERS[index % 2]).unwrap(),
        _ => Principal::group(GROUPS[index % 2]).unwrap(),
    }
}

type RecordSpec = (bool, usize, usize, usize, Vec<usize>);

fn record_spec() -> impl Strategy<Value = RecordSpec> {
    (
        any::<bool>(),
        0..2usize,
        0..INSTANCES.len(),
        0..4usize,
        prop::collection::vec(0..8usize, 1..3),
    )
}

fn build_record((grant, rt, instance, who, permissions): &RecordSpec) -> AuthorizationRecord {
    let resource_type = resource_type(*rt);
    let kind = if *grant { RecordKind::Grant } else { RecordKind::Revoke };
    AuthorizationRecord::new(
        kind,
        resource_type,
        ResourceInstance::parse(INSTANCES[*instance]).unwrap(),
        principal(*who),
        permissions.iter().map(|p| permission_for(resource_type, *p)),
    )
    .unwrap()
}

type TripleSpec = (usize, usize, usize);

fn build_triple((rt, instance, permission): &TripleSpec) -> PermissionTriple {
    let resource_type = resource_type(*rt);
    // skip the wildcard; lookups always name a concrete instance
    let instance = ResourceInstance::id(INSTANCES[1 + instance % 2]).unwrap();
    PermissionTriple::new(resource_type, instance, permission_for(resource_type, *permission)).unwrap()
}

fn build_request(paths: &[Vec<TripleSpec>]) -> AuthorizationRequest {
    let paths = paths
        .iter()
        .map(|triples| AuthorizationPath::new(triples.iter().map(build_triple).collect()).unwrap())
        .collect();
    AuthorizationRequest::new(paths).unwrap()
}

fn principal_set(user: usize, groups: &[bool; 2]) -> PrincipalSet {
    let groups = GROUPS
        .iter()
        .zip(groups.iter())
        .filter(|(_, member)| **member)
        .map(|(group, _)| *group);
    PrincipalSet::new(USERS[user % 2]).unwrap().with_groups(groups).unwrap()
}

fn resolvers(records: &[RecordSpec]) -> (PermissionResolver, PermissionResolver) {
    let store: Arc<dyn AuthorizationStore> = Arc::new(InMemoryAuthorizationStore::with_records(
        records.iter().map(build_record),
    ));
    (
        PermissionResolver::new(store.clone(), RevokeMode::Always),
        PermissionResolver::new(store, RevokeMode::Auto),
    )
}

proptest! {
    #[test]
    fn test_modes_agree_on_every_request(
        records in prop::collection::vec(record_spec(), 0..24),
        paths in prop::collection::vec(
            prop::collection::vec((0..2usize, 0..2usize, 0..8usize), 1..3),
            1..5,
        ),
        user in 0..2usize,
        groups in any::<[bool; 2]>(),
    ) {
        let (always, auto) = resolvers(&records);
        let request = build_request(&paths);
        let principals = principal_set(user, &groups);

        prop_assert_eq!(
            always.authorize(&principals, &request),
            auto.authorize(&principals, &request)
        );
    }

    #[test]
    fn test_modes_agree_on_every_triple(
        records in prop::collection::vec(record_spec(), 0..24),
        triple in (0..2usize, 0..2usize, 0..8usize),
        user in 0..2usize,
        groups in any::<[bool; 2]>(),
    ) {
        let (always, auto) = resolvers(&records);
        let triple = build_triple(&triple);
        let principals = principal_set(user, &groups);

        prop_assert_eq!(
            always.evaluate_triple(&principals, &triple),
            auto.evaluate_triple(&principals, &triple)
        );
    }

    #[test]
    fn test_covering_revoke_always_wins(
        records in prop::collection::vec(record_spec(), 0..24),
        triple in (0..2usize, 0..2usize, 0..8usize),
        revoke_on_any in any::<bool>(),
        mode in prop_oneof![Just(RevokeMode::Always), Just(RevokeMode::Auto)],
    ) {
        let triple = build_triple(&triple);
        let principals = PrincipalSet::new("u1").unwrap();

        let store = InMemoryAuthorizationStore::with_records(records.iter().map(build_record));
        // a grant at both scopes, then a revoke at one of them
        for instance in [ResourceInstance::Any, triple.instance.clone()] {
            store
                .grant(triple.resource_type, instance, Principal::user("u1").unwrap(), &[triple.permission])
                .unwrap();
        }
        let revoke_scope = if revoke_on_any { ResourceInstance::Any } else { triple.instance.clone() };
        store
            .revoke(triple.resource_type, revoke_scope, Principal::user("u1").unwrap(), &[triple.permission])
            .unwrap();

        let resolver = PermissionResolver::new(Arc::new(store), mode);
        prop_assert!(!resolver.evaluate_triple(&principals, &triple).is_granted());
    }

    #[test]
    fn test_grant_without_revokes_is_granted(
        triple in (0..2usize, 0..2usize, 0..8usize),
        via_group in any::<bool>(),
        on_any in any::<bool>(),
        mode in prop_oneof![Just(RevokeMode::Always), Just(RevokeMode::Auto)],
    ) {
        let triple = build_triple(&triple);
        let principals = PrincipalSet::new("u1").unwrap().with_group("g1").unwrap();
        let holder = if via_group { Principal::group("g1").unwrap() } else { Principal::user("u1").unwrap() };
        let scope = if on_any { ResourceInstance::Any } else { triple.instance.clone() };

        let store = InMemoryAuthorizationStore::new();
        store.grant(triple.resource_type, scope, holder, &[triple.permission]).unwrap();

        let resolver = PermissionResolver::new(Arc::new(store), mode);
        prop_assert!(resolver.evaluate_triple(&principals, &triple).is_granted());
    }
}
