//! Repository tests against a live PostgreSQL container
//!
//! Every test starts its own database. The tests need a container runtime
//! and are ignored by default; run them with `cargo test -- --ignored`.

use core_kernel::{CustomerId, PolicyId, PolicyMapId};
use domain_policy::Policy;
use infra_db::{DatabaseError, NomineeRepository, PolicyMapRepository, PolicyRepository};
use rust_decimal_macros::dec;
use test_utils::{
    create_isolated_test_database, db_test, DatabaseTestAssertions, IdFixtures, NomineeFixtures,
    PolicyFixtures, TemporalFixtures, TestEnrollmentBuilder,
};

mod policy_crud {
    use super::*;

    db_test!(test_insert_then_select_returns_stored_policy, |pool| {
        let repo = PolicyRepository::new(pool);
        let policy = PolicyFixtures::term_life();

        let id = repo.insert(&policy).await.unwrap();
        let stored = repo.select_policy_by_id(id).await.unwrap();

        assert_eq!(stored, Some(policy.with_id(id)));
    });

    db_test!(test_select_missing_policy_is_none, |pool| {
        let repo = PolicyRepository::new(pool);
        assert_eq!(repo.select_policy_by_id(PolicyId::new(404)).await.unwrap(), None);
    });

    db_test!(test_insert_rejects_invalid_policy, |pool| {
        let repo = PolicyRepository::new(pool);
        let mut policy = PolicyFixtures::term_life();
        policy.sum_assured_min = dec!(900000.00);

        let result = repo.insert(&policy).await;

        assert!(matches!(result, Err(DatabaseError::Validation(_))));
        assert!(repo.get_all_policies().await.unwrap().is_empty());
    });

    db_test!(test_update_replaces_mutable_columns, |pool| {
        let repo = PolicyRepository::new(pool);
        let id = repo.insert(&PolicyFixtures::term_life()).await.unwrap();

        let changed = Policy::builder()
            .policy_type("Endowment")
            .policy_name("Endowment Plus 25")
            .number_nominees(3)
            .tenure(25.5)
            .sum_assured(dec!(200000.00), dec!(750000.00))
            .pre_reqs("Income proof")
            .build()
            .unwrap();

        assert!(repo.update(&changed, id).await.unwrap());

        let stored = repo.select_policy_by_id(id).await.unwrap();
        assert_eq!(stored, Some(changed.with_id(id)));
    });

    db_test!(test_update_missing_policy_returns_false, |pool| {
        let repo = PolicyRepository::new(pool);
        let updated = repo
            .update(&PolicyFixtures::term_life(), PolicyId::new(99))
            .await
            .unwrap();

        assert!(!updated);
    });

    db_test!(test_get_all_policies_in_id_order, |pool| {
        let repo = PolicyRepository::new(pool);
        let first = repo.insert(&PolicyFixtures::term_life()).await.unwrap();
        let second = repo.insert(&PolicyFixtures::whole_life()).await.unwrap();
        let third = repo.insert(&PolicyFixtures::accidental()).await.unwrap();

        let ids: Vec<PolicyId> = repo
            .get_all_policies()
            .await
            .unwrap()
            .into_iter()
            .map(|policy| policy.policy_id)
            .collect();

        assert_eq!(ids, vec![first, second, third]);
    });

    db_test!(test_get_policies_with_type_matches_exactly, |pool| {
        let repo = PolicyRepository::new(pool);
        let term = repo.insert(&PolicyFixtures::term_life()).await.unwrap();
        repo.insert(&PolicyFixtures::whole_life()).await.unwrap();

        let found = repo.get_policies_with_type("Term").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].policy_id, term);

        assert!(repo.get_policies_with_type("term").await.unwrap().is_empty());
    });

    db_test!(test_policy_type_is_bound_not_interpolated, |pool| {
        let repo = PolicyRepository::new(pool);
        repo.insert(&PolicyFixtures::term_life()).await.unwrap();

        let found = repo
            .get_policies_with_type("Term' OR '1'='1")
            .await
            .unwrap();

        assert!(found.is_empty());
        assert_eq!(repo.get_all_policies().await.unwrap().len(), 1);
    });

    db_test!(test_largest_id_is_zero_when_empty, |pool| {
        let repo = PolicyRepository::new(pool);
        assert_eq!(repo.get_largest_id().await.unwrap(), 0);
    });

    db_test!(test_largest_id_tracks_maximum, |pool| {
        let repo = PolicyRepository::new(pool);
        repo.insert(&PolicyFixtures::term_life()).await.unwrap();
        let last = repo.insert(&PolicyFixtures::whole_life()).await.unwrap();

        assert_eq!(repo.get_largest_id().await.unwrap(), last.value());
    });

    db_test!(test_name_and_id_labels, |pool| {
        let repo = PolicyRepository::new(pool);
        assert_eq!(repo.select_all_policy_name_and_policy_id().await.unwrap(), None);

        let term = repo.insert(&PolicyFixtures::term_life()).await.unwrap();
        let whole = repo.insert(&PolicyFixtures::whole_life()).await.unwrap();

        let labels = repo.select_all_policy_name_and_policy_id().await.unwrap();
        assert_eq!(
            labels,
            Some(vec![
                format!("Term Life 20({})", term.value()),
                format!("Whole Life Classic({})", whole.value()),
            ])
        );
    });

    db_test!(test_delete_removes_policy, |pool| {
        let repo = PolicyRepository::new(pool);
        let id = repo.insert(&PolicyFixtures::accidental()).await.unwrap();

        assert!(repo.delete_policy_using_id(id).await.unwrap());
        assert_eq!(repo.select_policy_by_id(id).await.unwrap(), None);
        assert!(!repo.delete_policy_using_id(id).await.unwrap());
    });
}

mod enrollment_checks {
    use super::*;

    db_test!(test_check_policy_map_reflects_enrollment, |pool| {
        let policies = PolicyRepository::new(pool.clone());
        let maps = PolicyMapRepository::new(pool);
        let id = policies.insert(&PolicyFixtures::term_life()).await.unwrap();

        assert!(!policies.check_policy_map_with_policy_id(id).await.unwrap());

        maps.insert(&TestEnrollmentBuilder::new(id).build()).await.unwrap();

        assert!(policies.check_policy_map_with_policy_id(id).await.unwrap());
    });

    db_test!(test_delete_of_enrolled_policy_is_refused, |pool| {
        let policies = PolicyRepository::new(pool.clone());
        let maps = PolicyMapRepository::new(pool);
        let id = policies.insert(&PolicyFixtures::term_life()).await.unwrap();
        maps.insert(&TestEnrollmentBuilder::new(id).build()).await.unwrap();

        let result = policies.delete_policy_using_id(id).await;

        assert!(matches!(result, Err(DatabaseError::ForeignKeyViolation(_))));
        assert!(policies.select_policy_by_id(id).await.unwrap().is_some());
    });

    db_test!(test_enrollment_requires_existing_policy, |pool| {
        let maps = PolicyMapRepository::new(pool);
        let result = maps
            .insert(&TestEnrollmentBuilder::new(PolicyId::new(77)).build())
            .await;

        assert!(matches!(result, Err(DatabaseError::ForeignKeyViolation(_))));
    });

    db_test!(test_find_enrollment_by_customer_and_policy, |pool| {
        let policies = PolicyRepository::new(pool.clone());
        let maps = PolicyMapRepository::new(pool);
        let id = policies.insert(&PolicyFixtures::whole_life()).await.unwrap();
        let map_id = maps
            .insert(&TestEnrollmentBuilder::new(id).with_premium(dec!(42.50)).build())
            .await
            .unwrap();

        let found = maps
            .find_by_customer_and_policy(IdFixtures::customer_id(), id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, map_id);
        assert_eq!(found.premium_amount, dec!(42.50));

        let missing = maps
            .find_by_customer_and_policy(IdFixtures::other_customer_id(), id)
            .await
            .unwrap();
        assert!(missing.is_none());
    });

    db_test!(test_enrollment_keeps_primary_nominee, |pool| {
        let policies = PolicyRepository::new(pool.clone());
        let maps = PolicyMapRepository::new(pool.clone());
        let id = policies.insert(&PolicyFixtures::term_life()).await.unwrap();
        let spouse = NomineeRepository::new(pool)
            .insert(&NomineeFixtures::spouse())
            .await
            .unwrap();

        maps.insert(
            &TestEnrollmentBuilder::new(id)
                .with_nominee_id(spouse.nominee_id)
                .build(),
        )
        .await
        .unwrap();

        let found = maps
            .find_by_customer_and_policy(IdFixtures::customer_id(), id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.nominee_id, Some(spouse.nominee_id));
    });

    db_test!(test_find_enrollments_by_customer_oldest_first, |pool| {
        let policies = PolicyRepository::new(pool.clone());
        let maps = PolicyMapRepository::new(pool);
        let term = policies.insert(&PolicyFixtures::term_life()).await.unwrap();
        let whole = policies.insert(&PolicyFixtures::whole_life()).await.unwrap();

        let first = maps.insert(&TestEnrollmentBuilder::new(whole).build()).await.unwrap();
        let second = maps.insert(&TestEnrollmentBuilder::new(term).build()).await.unwrap();
        maps.insert(
            &TestEnrollmentBuilder::new(term)
                .with_customer_id(IdFixtures::other_customer_id())
                .build(),
        )
        .await
        .unwrap();

        let held = maps.find_by_customer(IdFixtures::customer_id()).await.unwrap();
        let ids: Vec<PolicyMapId> = held.iter().map(|map| map.id).collect();

        assert_eq!(ids, vec![first, second]);
        assert_eq!(held[0].policy_id, whole);
    });
}

mod customer_policies {
    use super::*;

    db_test!(test_customer_policies_keep_terms_aligned, |pool| {
        let policies = PolicyRepository::new(pool.clone());
        let maps = PolicyMapRepository::new(pool.clone());
        let nominees = NomineeRepository::new(pool);

        let term = policies.insert(&PolicyFixtures::term_life()).await.unwrap();
        let whole = policies.insert(&PolicyFixtures::whole_life()).await.unwrap();

        let term_map = maps
            .insert(
                &TestEnrollmentBuilder::new(term)
                    .with_payments_per_year(12)
                    .with_premium(dec!(150.00))
                    .build(),
            )
            .await
            .unwrap();
        let whole_map = maps
            .insert(
                &TestEnrollmentBuilder::new(whole)
                    .with_start_date(TemporalFixtures::later_start())
                    .with_payments_per_year(1)
                    .with_premium(dec!(2400.00))
                    .build(),
            )
            .await
            .unwrap();

        let spouse = nominees.insert(&NomineeFixtures::spouse()).await.unwrap();
        let parent = nominees.insert(&NomineeFixtures::parent()).await.unwrap();
        nominees.link_to_policy_map(term_map, spouse.nominee_id).await.unwrap();
        nominees.link_to_policy_map(whole_map, parent.nominee_id).await.unwrap();

        let held = policies
            .get_all_customer_policies(IdFixtures::customer_id())
            .await
            .unwrap();

        assert_eq!(held.len(), 2);

        assert_eq!(held[0].policy_id, term);
        assert_eq!(held[0].payments_per_year, Some(12));
        assert_eq!(held[0].premium_amount, Some(dec!(150)));
        assert_eq!(held[0].start_date, Some(TemporalFixtures::enrollment_start()));
        assert_eq!(held[0].nominees, vec![spouse]);

        assert_eq!(held[1].policy_id, whole);
        assert_eq!(held[1].payments_per_year, Some(1));
        assert_eq!(held[1].premium_amount, Some(dec!(2400)));
        assert_eq!(held[1].start_date, Some(TemporalFixtures::later_start()));
        assert_eq!(held[1].nominees, vec![parent]);
    });

    db_test!(test_customer_without_enrollments_has_no_policies, |pool| {
        let policies = PolicyRepository::new(pool);
        policies.insert(&PolicyFixtures::term_life()).await.unwrap();

        let customer = IdFixtures::other_customer_id();
        assert!(policies.get_all_customer_policies(customer).await.unwrap().is_empty());
        assert!(policies.get_policies_by_customer_id(customer).await.unwrap().is_empty());
    });

    db_test!(test_policies_by_customer_carry_payment_terms, |pool| {
        let policies = PolicyRepository::new(pool.clone());
        let maps = PolicyMapRepository::new(pool);
        let id = policies.insert(&PolicyFixtures::accidental()).await.unwrap();
        maps.insert(
            &TestEnrollmentBuilder::new(id)
                .with_customer_id(CustomerId::new(3003))
                .with_payments_per_year(4)
                .with_premium(dec!(80.25))
                .build(),
        )
        .await
        .unwrap();

        let held = policies
            .get_policies_by_customer_id(CustomerId::new(3003))
            .await
            .unwrap();

        assert_eq!(held.len(), 1);
        assert_eq!(held[0].policy_name, "Accident Shield");
        assert_eq!(held[0].payments_per_year, Some(4));
        assert_eq!(held[0].premium_amount, Some(dec!(80.25)));
        assert_eq!(held[0].start_date, None);
        assert!(held[0].nominees.is_empty());
    });
}

mod nominee_links {
    use super::*;

    async fn enrolled_map(pool: &sqlx::PgPool) -> PolicyMapId {
        let policy_id = PolicyRepository::new(pool.clone())
            .insert(&PolicyFixtures::term_life())
            .await
            .unwrap();
        PolicyMapRepository::new(pool.clone())
            .insert(&TestEnrollmentBuilder::new(policy_id).build())
            .await
            .unwrap()
    }

    db_test!(test_insert_then_find_nominee, |pool| {
        let repo = NomineeRepository::new(pool);
        let stored = repo.insert(&NomineeFixtures::spouse()).await.unwrap();

        let found = repo.find_by_id(stored.nominee_id).await.unwrap();

        assert_eq!(found, Some(stored.clone()));
        assert_eq!(stored.share_percentage, dec!(60));
    });

    db_test!(test_nominees_come_back_in_link_order, |pool| {
        let map_id = enrolled_map(&pool).await;
        let repo = NomineeRepository::new(pool);
        let child = repo.insert(&NomineeFixtures::child()).await.unwrap();
        let spouse = repo.insert(&NomineeFixtures::spouse()).await.unwrap();

        repo.link_to_policy_map(map_id, spouse.nominee_id).await.unwrap();
        repo.link_to_policy_map(map_id, child.nominee_id).await.unwrap();

        let linked = repo.get_nominees_by_map_id(map_id).await.unwrap();
        assert_eq!(linked, vec![spouse, child]);
    });

    db_test!(test_duplicate_link_is_ignored, |pool| {
        let map_id = enrolled_map(&pool).await;
        let repo = NomineeRepository::new(pool);
        let parent = repo.insert(&NomineeFixtures::parent()).await.unwrap();

        assert!(repo.link_to_policy_map(map_id, parent.nominee_id).await.unwrap());
        assert!(!repo.link_to_policy_map(map_id, parent.nominee_id).await.unwrap());
        assert_eq!(repo.get_nominees_by_map_id(map_id).await.unwrap().len(), 1);
    });

    db_test!(test_map_without_links_has_no_nominees, |pool| {
        let map_id = enrolled_map(&pool).await;
        let repo = NomineeRepository::new(pool);

        assert!(repo.get_nominees_by_map_id(map_id).await.unwrap().is_empty());
    });

    db_test!(test_deleting_enrollment_drops_its_links, |pool| {
        let map_id = enrolled_map(&pool).await;
        let nominees = NomineeRepository::new(pool.clone());
        let spouse = nominees.insert(&NomineeFixtures::spouse()).await.unwrap();
        nominees.link_to_policy_map(map_id, spouse.nominee_id).await.unwrap();

        assert!(PolicyMapRepository::new(pool.clone()).delete(map_id).await.unwrap());

        sqlx::query("DELETE FROM nominee_map WHERE policy_map_id = $1")
            .bind(map_id.value())
            .execute(&pool)
            .await
            .unwrap()
            .assert_rows_affected(0);
        assert!(nominees.find_by_id(spouse.nominee_id).await.unwrap().is_some());
    });
}

#[tokio::test]
#[ignore = "requires a container runtime"]
async fn test_cleared_database_restarts_ids() {
    let db = create_isolated_test_database()
        .await
        .expect("Failed to create test database");
    let repo = PolicyRepository::new(db.pool().clone());
    repo.insert(&PolicyFixtures::term_life()).await.unwrap();
    repo.insert(&PolicyFixtures::whole_life()).await.unwrap();

    db.clear_data().await.unwrap();

    assert_eq!(repo.get_largest_id().await.unwrap(), 0);
    assert_eq!(repo.select_all_policy_name_and_policy_id().await.unwrap(), None);
    let id = repo.insert(&PolicyFixtures::accidental()).await.unwrap();
    assert_eq!(id, PolicyId::new(1));
}

#[test]
fn test_catalogue_label_format() {
    assert_eq!(Policy::catalogue_label("Term Life 20", PolicyId::new(3)), "Term Life 20(3)");
}
