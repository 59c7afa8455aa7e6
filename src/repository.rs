//! Entity-agnostic data access.
//!
//! [`Repository`] wraps a connection handle plus a resource name used in
//! not-found messages. It is effectively immutable and cheap to clone, so one
//! instance per entity type can be shared across concurrent requests.
//! Mutating operations take an optional open transaction which is used in
//! place of the default handle. Query operations consume the scope lists a
//! [`Pagination`] resolves: listing applies filter scopes then meta scopes,
//! counting applies filter scopes only.

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection,
    DatabaseTransaction, EntityTrait, IntoActiveModel, PaginatorTrait, PrimaryKeyTrait,
    QueryFilter, Related, Value,
};
use std::marker::PhantomData;

use crate::errors::ApiError;
use crate::pagination::Pagination;
use crate::scope::apply_scopes;

type PrimaryKey<E> = <<E as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

#[derive(Debug, Clone)]
pub struct Repository<E: EntityTrait> {
    db: DatabaseConnection,
    resource: &'static str,
    _entity: PhantomData<E>,
}

impl<E: EntityTrait> Repository<E> {
    /// `resource` is the singular display name used in not-found errors,
    /// e.g. `"Follower"`.
    #[must_use]
    pub fn new(db: DatabaseConnection, resource: &'static str) -> Self {
        Self {
            db,
            resource,
            _entity: PhantomData,
        }
    }

    #[must_use]
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Insert a new record.
    ///
    /// # Errors
    /// `Duplicate` / `ForeignKey` on constraint violations, `Database`
    /// otherwise.
    pub async fn create<A>(
        &self,
        model: A,
        txn: Option<&DatabaseTransaction>,
    ) -> Result<E::Model, ApiError>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        let result = match txn {
            Some(txn) => model.insert(txn).await,
            None => model.insert(&self.db).await,
        };
        result.map_err(ApiError::from)
    }

    /// Update an existing record from its active model.
    ///
    /// # Errors
    /// `NotFound` when no row matches, constraint and store errors as for
    /// [`create`](Self::create).
    pub async fn update<A>(
        &self,
        model: A,
        txn: Option<&DatabaseTransaction>,
    ) -> Result<E::Model, ApiError>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        let result = match txn {
            Some(txn) => model.update(txn).await,
            None => model.update(&self.db).await,
        };
        result.map_err(ApiError::from)
    }

    /// Delete by primary key.
    ///
    /// # Errors
    /// `NotFound` when no row was deleted.
    pub async fn delete(
        &self,
        id: PrimaryKey<E>,
        txn: Option<&DatabaseTransaction>,
    ) -> Result<(), ApiError> {
        let statement = E::delete_by_id(id);
        let result = match txn {
            Some(txn) => statement.exec(txn).await,
            None => statement.exec(&self.db).await,
        }
        .map_err(ApiError::from)?;

        if result.rows_affected == 0 {
            return Err(ApiError::not_found(self.resource, None));
        }
        Ok(())
    }

    /// Fetch one record by primary key.
    ///
    /// # Errors
    /// `NotFound` is distinct from other store failures.
    pub async fn find_by_id(&self, id: PrimaryKey<E>) -> Result<E::Model, ApiError>
    where
        PrimaryKey<E>: Clone,
    {
        E::find_by_id(id.clone())
            .one(&self.db)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::not_found(self.resource, Some(format!("{id:?}"))))
    }

    /// Fetch one record by primary key together with a related record,
    /// eagerly loaded in the same query.
    ///
    /// # Errors
    /// `NotFound` when the primary record does not exist; the related side
    /// is optional.
    pub async fn find_by_id_with<R>(
        &self,
        id: PrimaryKey<E>,
        related: R,
    ) -> Result<(E::Model, Option<R::Model>), ApiError>
    where
        R: EntityTrait,
        E: Related<R>,
        PrimaryKey<E>: Clone,
    {
        E::find_by_id(id.clone())
            .find_also_related(related)
            .one(&self.db)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::not_found(self.resource, Some(format!("{id:?}"))))
    }

    /// List records matching the pagination's filter scopes, with its limit,
    /// offset and order applied after the filters.
    ///
    /// # Errors
    /// Store failures only; malformed filter input never errors.
    pub async fn find_all(&self, pagination: &Pagination) -> Result<Vec<E::Model>, ApiError> {
        let scopes = pagination.build_scopes();
        let query = apply_scopes(E::find(), &scopes.filters);
        let query = apply_scopes(query, &scopes.meta);
        query.all(&self.db).await.map_err(ApiError::from)
    }

    /// Count records matching the pagination's filter scopes. Meta scopes
    /// are skipped so the count is not capped by the page size.
    ///
    /// # Errors
    /// Store failures only.
    pub async fn count(&self, pagination: &Pagination) -> Result<u64, ApiError>
    where
        E::Model: Sync,
    {
        let scopes = pagination.build_scopes();
        apply_scopes(E::find(), &scopes.filters)
            .count(&self.db)
            .await
            .map_err(ApiError::from)
    }

    /// All records where `column = value`.
    ///
    /// # Errors
    /// Store failures only.
    pub async fn find_by_field(
        &self,
        column: E::Column,
        value: impl Into<Value> + Send,
    ) -> Result<Vec<E::Model>, ApiError> {
        E::find()
            .filter(column.eq(value))
            .all(&self.db)
            .await
            .map_err(ApiError::from)
    }

    /// First record where `column = value`.
    ///
    /// # Errors
    /// `NotFound` when nothing matches.
    pub async fn find_one_by_field(
        &self,
        column: E::Column,
        value: impl Into<Value> + Send,
    ) -> Result<E::Model, ApiError> {
        E::find()
            .filter(column.eq(value))
            .one(&self.db)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::not_found(self.resource, None))
    }

    /// All records matching every `column = value` pair.
    ///
    /// # Errors
    /// Store failures only.
    pub async fn find_by_fields(
        &self,
        fields: Vec<(E::Column, Value)>,
    ) -> Result<Vec<E::Model>, ApiError> {
        E::find()
            .filter(fields_condition(&fields))
            .all(&self.db)
            .await
            .map_err(ApiError::from)
    }

    /// First record matching every `column = value` pair.
    ///
    /// # Errors
    /// `NotFound` when nothing matches.
    pub async fn find_one_by_fields(
        &self,
        fields: Vec<(E::Column, Value)>,
    ) -> Result<E::Model, ApiError> {
        E::find()
            .filter(fields_condition(&fields))
            .one(&self.db)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::not_found(self.resource, None))
    }

    /// Whether any record matches every `column = value` pair.
    ///
    /// # Errors
    /// Store failures only.
    pub async fn exists(&self, fields: Vec<(E::Column, Value)>) -> Result<bool, ApiError>
    where
        E::Model: Sync,
    {
        let count = E::find()
            .filter(fields_condition(&fields))
            .count(&self.db)
            .await
            .map_err(ApiError::from)?;
        Ok(count > 0)
    }
}

fn fields_condition<C: ColumnTrait>(fields: &[(C, Value)]) -> Condition {
    fields
        .iter()
        .fold(Condition::all(), |condition, (column, value)| {
            condition.add(column.eq(value.clone()))
        })
}
