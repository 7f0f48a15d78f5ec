use std::collections::HashMap;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::{
        export::{ExportLine, OrderExport},
        order::{
            NewOrder as DomainNewOrder, Order as DomainOrder, OrderListQuery,
            OrderStatus as DomainOrderStatus, StatusTransition, UpdateOrder as DomainUpdateOrder,
            UpdatedOrder,
        },
    },
    models::{
        logistics::{Address, Carrier, CarrierService, Contact},
        material::{Material as DbMaterial, Uom as DbUom},
        order::{
            NewOrder as DbNewOrder, NewOrderLine as DbNewOrderLine, Order as DbOrder,
            OrderLine as DbOrderLine, OrderStatus as DbOrderStatus, UpdateOrder as DbUpdateOrder,
        },
        project::{Client as DbClient, Project as DbProject},
    },
    repository::{DieselRepository, OrderReader, OrderWriter, counter::next_order_code},
    schema::orders,
};

fn load_lines(conn: &mut SqliteConnection, order_id: i32) -> QueryResult<Vec<DbOrderLine>> {
    use crate::schema::order_lines;

    order_lines::table
        .filter(order_lines::order_id.eq(order_id))
        .order(order_lines::id.asc())
        .load::<DbOrderLine>(conn)
}

fn insert_lines(
    conn: &mut SqliteConnection,
    order_id: i32,
    lines: &[crate::domain::order::NewOrderLine],
) -> QueryResult<usize> {
    use crate::schema::order_lines;

    if lines.is_empty() {
        return Ok(0);
    }

    let payload: Vec<DbNewOrderLine> = lines
        .iter()
        .map(|line| DbNewOrderLine::from_domain(order_id, line))
        .collect();

    diesel::insert_into(order_lines::table)
        .values(&payload)
        .execute(conn)
}

fn filtered_orders(
    project_ids: &[i32],
    project_id: Option<i32>,
    status_id: Option<i32>,
    search_pattern: Option<&str>,
) -> orders::BoxedQuery<'static, Sqlite> {
    let mut query = orders::table
        .filter(orders::project_id.eq_any(project_ids.to_vec()))
        .into_boxed::<Sqlite>();

    if let Some(project_id) = project_id {
        query = query.filter(orders::project_id.eq(project_id));
    }

    if let Some(status_id) = status_id {
        query = query.filter(orders::order_status_id.eq(status_id));
    }

    if let Some(pattern) = search_pattern {
        let pattern = pattern.to_string();
        query = query.filter(
            orders::order_code
                .like(pattern.clone())
                .or(orders::shipment_code.like(pattern.clone()))
                .or(orders::reference_number.like(pattern.clone()))
                .or(orders::notes.like(pattern)),
        );
    }

    query
}

impl OrderReader for DieselRepository {
    fn get_order_by_id(
        &self,
        id: i32,
        project_ids: &[i32],
    ) -> RepositoryResult<Option<DomainOrder>> {
        let mut conn = self.conn()?;
        let order = orders::table
            .filter(orders::id.eq(id))
            .filter(orders::project_id.eq_any(project_ids.to_vec()))
            .first::<DbOrder>(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let lines = load_lines(&mut conn, order.id)?;

        Ok(Some(DomainOrder::from((order, lines))))
    }

    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<DomainOrder>)> {
        use crate::schema::order_lines;

        let OrderListQuery {
            project_ids,
            project_id,
            status_id,
            search,
            pagination,
        } = query;

        if project_ids.is_empty() {
            return Ok((0, Vec::new()));
        }

        let mut conn = self.conn()?;

        let search_pattern = search.as_ref().map(|term| format!("%{}%", term));

        let total = filtered_orders(&project_ids, project_id, status_id, search_pattern.as_deref())
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items =
            filtered_orders(&project_ids, project_id, status_id, search_pattern.as_deref())
                .order((orders::created_at.desc(), orders::id.desc()));

        if let Some(pagination) = pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let db_orders = items.load::<DbOrder>(&mut conn)?;
        if db_orders.is_empty() {
            return Ok((total, Vec::new()));
        }

        let order_ids: Vec<i32> = db_orders.iter().map(|order| order.id).collect();

        let mut lines_by_order: HashMap<i32, Vec<DbOrderLine>> = HashMap::new();

        let rows = order_lines::table
            .filter(order_lines::order_id.eq_any(&order_ids))
            .order(order_lines::id.asc())
            .load::<DbOrderLine>(&mut conn)?;

        for line in rows {
            lines_by_order.entry(line.order_id).or_default().push(line);
        }

        let orders = db_orders
            .into_iter()
            .map(|order| {
                let lines = lines_by_order.remove(&order.id).unwrap_or_default();
                DomainOrder::from((order, lines))
            })
            .collect();

        Ok((total, orders))
    }

    fn get_order_export(&self, order_id: i32) -> RepositoryResult<Option<OrderExport>> {
        use crate::schema::{
            addresses, carrier_services, carriers, clients, contacts, materials, projects, uoms,
        };

        let mut conn = self.conn()?;

        let Some(order) = orders::table
            .filter(orders::id.eq(order_id))
            .first::<DbOrder>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        let project = projects::table
            .filter(projects::id.eq(order.project_id))
            .select(DbProject::as_select())
            .first::<DbProject>(&mut conn)?;

        let client = match project.client_id {
            Some(client_id) => clients::table
                .filter(clients::id.eq(client_id))
                .first::<DbClient>(&mut conn)
                .optional()?,
            None => None,
        };

        let contact = match order.contact_id {
            Some(contact_id) => contacts::table
                .filter(contacts::id.eq(contact_id))
                .first::<Contact>(&mut conn)
                .optional()?,
            None => None,
        };

        let shipping_address = match order.shipping_address_id {
            Some(address_id) => addresses::table
                .filter(addresses::id.eq(address_id))
                .first::<Address>(&mut conn)
                .optional()?,
            None => None,
        };

        let carrier = match order.carrier_id {
            Some(carrier_id) => carriers::table
                .filter(carriers::id.eq(carrier_id))
                .first::<Carrier>(&mut conn)
                .optional()?,
            None => None,
        };

        let service_type = match order.service_type_id {
            Some(service_id) => carrier_services::table
                .filter(carrier_services::id.eq(service_id))
                .first::<CarrierService>(&mut conn)
                .optional()?,
            None => None,
        };

        let lines = load_lines(&mut conn, order.id)?;

        let material_ids: Vec<i32> = lines.iter().map(|line| line.material_id).collect();
        let db_materials = materials::table
            .filter(materials::id.eq_any(&material_ids))
            .load::<DbMaterial>(&mut conn)?;

        let uom_ids: Vec<i32> = lines
            .iter()
            .filter_map(|line| line.uom_id)
            .chain(db_materials.iter().filter_map(|material| material.uom_id))
            .collect();
        let units: HashMap<i32, DbUom> = uoms::table
            .filter(uoms::id.eq_any(&uom_ids))
            .load::<DbUom>(&mut conn)?
            .into_iter()
            .map(|uom| (uom.id, uom))
            .collect();

        let materials_by_id: HashMap<i32, DbMaterial> = db_materials
            .into_iter()
            .map(|material| (material.id, material))
            .collect();

        let mut export_lines = Vec::with_capacity(lines.len());
        for line in &lines {
            let material = materials_by_id
                .get(&line.material_id)
                .cloned()
                .ok_or(RepositoryError::NotFound)?;
            let material_uom = material.uom_id.and_then(|id| units.get(&id).cloned());
            let line_uom = line.uom_id.and_then(|id| units.get(&id).cloned());

            export_lines.push(ExportLine {
                line: line.clone().into(),
                material: material.into_domain(material_uom),
                uom: line_uom.map(Into::into),
            });
        }

        Ok(Some(OrderExport {
            order: DomainOrder::from((order, lines)),
            project: project.into(),
            client: client.map(Into::into),
            contact: contact.map(Into::into),
            shipping_address: shipping_address.map(Into::into),
            carrier: carrier.map(Into::into),
            service_type: service_type.map(Into::into),
            lines: export_lines,
        }))
    }

    fn list_order_statuses(&self) -> RepositoryResult<Vec<DomainOrderStatus>> {
        use crate::schema::order_statuses;

        let mut conn = self.conn()?;

        let statuses = order_statuses::table
            .order(order_statuses::id.asc())
            .load::<DbOrderStatus>(&mut conn)?;

        Ok(statuses.into_iter().map(Into::into).collect())
    }

    fn order_code_exists(&self, code: &str) -> RepositoryResult<bool> {
        let mut conn = self.conn()?;

        let taken = diesel::select(diesel::dsl::exists(
            orders::table.filter(orders::order_code.eq(code).or(orders::shipment_code.eq(code))),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(taken)
    }
}

impl OrderWriter for DieselRepository {
    fn create_order(&self, new_order: &DomainNewOrder) -> RepositoryResult<DomainOrder> {
        let mut conn = self.conn()?;

        conn.immediate_transaction::<DomainOrder, RepositoryError, _>(|conn| {
            let generated = if new_order.needs_generated_code() {
                Some(next_order_code(conn, new_order.project_id)?)
            } else {
                None
            };

            let order_code = new_order
                .order_code
                .as_deref()
                .or(generated.as_deref())
                .unwrap_or_default();
            let shipment_code = new_order
                .shipment_code
                .as_deref()
                .or(generated.as_deref())
                .unwrap_or_default();

            let db_new = DbNewOrder::from_domain(new_order, order_code, shipment_code);

            let created = diesel::insert_into(orders::table)
                .values(&db_new)
                .get_result::<DbOrder>(conn)?;

            insert_lines(conn, created.id, &new_order.lines)?;

            let lines = load_lines(conn, created.id)?;

            log::info!(
                "Created order {} for project {}",
                created.order_code,
                created.project_id
            );

            Ok(DomainOrder::from((created, lines)))
        })
    }

    fn update_order(
        &self,
        order_id: i32,
        updates: &DomainUpdateOrder,
    ) -> RepositoryResult<UpdatedOrder> {
        use crate::schema::order_lines;

        let mut conn = self.conn()?;

        conn.immediate_transaction::<UpdatedOrder, RepositoryError, _>(|conn| {
            let previous_status = orders::table
                .filter(orders::id.eq(order_id))
                .select(orders::order_status_id)
                .first::<i32>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)?;

            let db_updates = DbUpdateOrder::from(updates);

            let updated = diesel::update(orders::table.filter(orders::id.eq(order_id)))
                .set(&db_updates)
                .get_result::<DbOrder>(conn)?;

            if let Some(lines) = updates.lines.as_ref() {
                diesel::delete(order_lines::table.filter(order_lines::order_id.eq(order_id)))
                    .execute(conn)?;
                insert_lines(conn, order_id, lines)?;
            }

            let transition = StatusTransition::new(previous_status, updated.order_status_id);
            let lines = load_lines(conn, order_id)?;

            Ok(UpdatedOrder {
                order: DomainOrder::from((updated, lines)),
                transition,
            })
        })
    }

    fn delete_order(&self, order_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted =
            diesel::delete(orders::table.filter(orders::id.eq(order_id))).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    fn clear_order_lines(&self, order_id: i32) -> RepositoryResult<usize> {
        use crate::schema::order_lines;

        let mut conn = self.conn()?;

        let deleted = diesel::delete(order_lines::table.filter(order_lines::order_id.eq(order_id)))
            .execute(&mut conn)?;

        Ok(deleted)
    }

    fn mark_file_generated(&self, order_id: i32, at: NaiveDateTime) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let updated = diesel::update(orders::table.filter(orders::id.eq(order_id)))
            .set((
                orders::file_generated.eq(true),
                orders::file_generated_at.eq(Some(at)),
            ))
            .execute(&mut conn)?;
        if updated == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
